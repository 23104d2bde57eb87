//! Object binder - binding tables and the apply loop
//!
//! `Bindings<T>` is the explicit registration of a type's bindable members:
//! one entry per member with its declaration, declared `TargetType` and a
//! setter closure. Application walks fields first, then methods.

use std::fmt;

use tracing::{debug, trace};

use super::declaration::{BindingDeclaration, MemberKind};
use crate::decoder::Decoder;
use crate::error::{MetabindError, Result};
use crate::value::{coerce, FromValue, TargetType, Value};

type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>;

/// Types that expose a static binding table
pub trait MetadataBound: Sized + 'static {
    fn bindings() -> &'static Bindings<Self>;
}

/// One registered member
pub struct Binding<T> {
    member: &'static str,
    member_kind: MemberKind,
    key: String,
    declaration: BindingDeclaration,
    target: TargetType,
    setter: Setter<T>,
}

impl<T> Binding<T> {
    /// Member identifier (field or method name)
    pub fn member(&self) -> &'static str {
        self.member
    }

    pub fn member_kind(&self) -> MemberKind {
        self.member_kind
    }

    /// Effective metadata key (field name when the declaration left it empty)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn declaration(&self) -> &BindingDeclaration {
        &self.declaration
    }

    /// Declared type of the field, or of the setter's sole parameter
    pub fn target(&self) -> TargetType {
        self.target
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("member", &self.member)
            .field("member_kind", &self.member_kind)
            .field("key", &self.key)
            .field("declaration", &self.declaration)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Outcome of a bind, by member name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Members whose setter ran
    pub applied: Vec<&'static str>,
    /// Members whose key is absent from the store
    pub skipped: Vec<&'static str>,
    /// Indirect members with no inferable kind
    pub unresolved: Vec<&'static str>,
}

/// Binding table for `T`: fields first, then methods
pub struct Bindings<T> {
    fields: Vec<Binding<T>>,
    methods: Vec<Binding<T>>,
}

impl<T> Bindings<T> {
    pub fn builder() -> BindingsBuilder<T> {
        BindingsBuilder {
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A table with no bindings; binding against it is a no-op
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// All bindings in application order
    pub fn iter(&self) -> impl Iterator<Item = &Binding<T>> {
        self.fields.iter().chain(self.methods.iter())
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.methods.is_empty()
    }

    /// Resolve every binding through `decoder` and apply it to `target`
    ///
    /// Absent keys and uninferable kinds leave the member untouched. The
    /// first error stops the loop; members applied before it stay applied.
    pub(crate) fn apply(&self, decoder: &Decoder, target: &mut T) -> Result<BindReport> {
        let mut report = BindReport::default();

        for binding in self.iter() {
            let key = binding.key.as_str();
            if !decoder.metadata().contains(key) {
                trace!(member = binding.member, key, "no metadata entry, skipping");
                report.skipped.push(binding.member);
                continue;
            }

            let resolved = decoder.resolve(
                key,
                binding.declaration.is_indirect(),
                binding.declaration.kind_hint(),
                binding.target,
            )?;

            match resolved {
                Some(value) => {
                    (binding.setter)(target, value)?;
                    report.applied.push(binding.member);
                }
                None => {
                    debug!(
                        member = binding.member,
                        key,
                        target = ?binding.target,
                        "no resource kind for member type, leaving unset"
                    );
                    report.unresolved.push(binding.member);
                }
            }
        }

        Ok(report)
    }
}

impl<T> fmt::Debug for Bindings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Builder for [`Bindings`]
///
/// Validation runs in [`BindingsBuilder::build`].
pub struct BindingsBuilder<T> {
    fields: Vec<Binding<T>>,
    methods: Vec<Binding<T>>,
}

impl<T: 'static> BindingsBuilder<T> {
    /// Bind a field; an empty declaration key falls back to `name`
    pub fn field<V, F>(mut self, name: &'static str, declaration: BindingDeclaration, set: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let key = if declaration.key().is_empty() {
            name.to_string()
        } else {
            declaration.key().to_string()
        };
        let binding = make_binding(name, MemberKind::Field, key, declaration, move |t: &mut T, v: V| {
            set(t, v);
            Ok(())
        });
        self.fields.push(binding);
        self
    }

    /// Bind a single-parameter setter
    pub fn method<V, F>(self, name: &'static str, declaration: BindingDeclaration, set: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.try_method(name, declaration, move |t: &mut T, v: V| {
            set(t, v);
            Ok(())
        })
    }

    /// Bind a fallible single-parameter setter; its error aborts the bind
    pub fn try_method<V, F>(
        mut self,
        name: &'static str,
        declaration: BindingDeclaration,
        set: F,
    ) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) -> Result<()> + Send + Sync + 'static,
    {
        let key = declaration.key().to_string();
        let binding = make_binding(name, MemberKind::Method, key, declaration, set);
        self.methods.push(binding);
        self
    }

    /// Finish the table, rejecting method bindings without a key
    pub fn build(self) -> Result<Bindings<T>> {
        if let Some(keyless) = self.methods.iter().find(|b| b.key.is_empty()) {
            return Err(MetabindError::MissingMethodKey {
                member: keyless.member.to_string(),
            });
        }

        Ok(Bindings {
            fields: self.fields,
            methods: self.methods,
        })
    }
}

fn make_binding<T, V, F>(
    member: &'static str,
    member_kind: MemberKind,
    key: String,
    declaration: BindingDeclaration,
    set: F,
) -> Binding<T>
where
    T: 'static,
    V: FromValue + 'static,
    F: Fn(&mut T, V) -> Result<()> + Send + Sync + 'static,
{
    let setter_key = key.clone();
    Binding {
        member,
        member_kind,
        key,
        declaration,
        target: V::TARGET,
        setter: Box::new(move |t: &mut T, value: Value| {
            set(t, coerce::<V>(&setter_key, value)?)
        }),
    }
}
