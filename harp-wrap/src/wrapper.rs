//! The wrapping engine
//!
//! Orchestration that turns an object (or a collection) plus a policy,
//! plus an optional [`ActionResolver`], into [`Resource`]s. Everything is
//! synchronous; the only external call is the resolver.

use crate::compiled::CompiledPolicy;
use crate::error::Result;
use crate::expr::eval::eval;
use crate::expr::{BoundArg, Env};
use crate::policy::{CollectionWrapPolicy, WrapPolicy};
use crate::resolver::{ActionRequest, ActionResolver};
use crate::WrapError;
use harp_resource::{Link, NamedLink, Resource};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

// The wrapped instance serialized on first use. Property getters and
// instance-bound link arguments share one serialization per wrap call;
// wrap calls that need neither never serialize at all.
struct LazyInstance<'a, T: Serialize> {
    obj: &'a T,
    value: Option<Value>,
}

impl<'a, T: Serialize> LazyInstance<'a, T> {
    fn new(obj: &'a T) -> Self {
        Self { obj, value: None }
    }

    fn value(&mut self) -> Result<&Value> {
        if self.value.is_none() {
            self.value = Some(serde_json::to_value(self.obj)?);
        }
        self.value
            .as_ref()
            .ok_or_else(|| WrapError::Internal("serialized instance missing".to_string()))
    }
}

impl<T: Serialize + 'static> CompiledPolicy<T> {
    /// Wrap one object into a [`Resource`].
    ///
    /// Without a resolver the linking phase is skipped entirely; link rules
    /// are resolver-dependent and their absence is not an error.
    pub fn wrap(&self, obj: &T, resolver: Option<&dyn ActionResolver>) -> Result<Resource> {
        let mut resource = Resource::new();
        let mut instance = LazyInstance::new(obj);

        match resolver {
            Some(resolver) => self.resolve_links(obj, &mut instance, resolver, &mut resource)?,
            None => trace!("no action resolver supplied; skipping link resolution"),
        }

        for (name, getter) in self.getter_entries() {
            let value = {
                let serialized = instance.value()?;
                getter.invoke(&Env::for_instance::<T>(serialized))?
            };
            resource.set(name.clone(), value);
        }

        trace!(
            links = resource.links().len(),
            properties = resource.properties().len(),
            "wrapped resource"
        );
        Ok(resource)
    }

    /// Wrap a sequence of objects lazily, one [`Resource`] per item in
    /// source order. Properties come from this compiled mapping; links are
    /// resolved independently per item.
    pub fn wrap_all<'a, I>(
        &self,
        items: I,
        resolver: Option<&'a dyn ActionResolver>,
    ) -> ResourceStream<'a, T, I::IntoIter>
    where
        I: IntoIterator<Item = &'a T>,
    {
        ResourceStream {
            compiled: self.clone(),
            items: items.into_iter(),
            resolver,
        }
    }

    fn resolve_links(
        &self,
        obj: &T,
        instance: &mut LazyInstance<'_, T>,
        resolver: &dyn ActionResolver,
        resource: &mut Resource,
    ) -> Result<()> {
        for rule in self.link_rules() {
            if !rule.applies_to(obj) {
                continue;
            }

            let call = match rule.call() {
                Some(call) => call,
                None => {
                    debug!(
                        rule = rule.name(),
                        "link rule body is not a method call; emitting no link"
                    );
                    continue;
                }
            };

            let mut parameters: Vec<(String, Value)> = Vec::new();
            for (name, arg) in rule.bound_args() {
                let value = match arg {
                    BoundArg::Constant(value) => value.clone(),
                    BoundArg::PerInstance(expr) => {
                        let serialized = instance.value()?;
                        eval(expr, &Env::for_instance::<T>(serialized))?
                    }
                };
                merge_parameter(&mut parameters, name.clone(), value);
            }
            for (name, value) in rule.query_parameters() {
                merge_parameter(&mut parameters, name.clone(), value.clone());
            }
            for (name, value) in rule.callback_parameters(obj) {
                merge_parameter(&mut parameters, name, value);
            }

            let request = ActionRequest {
                controller: rule.controller_name().to_string(),
                action: call.method.clone(),
                parameters,
            };
            let url = resolver.action_url(&request)?;
            let url = percent_decode_str(&url).decode_utf8_lossy().into_owned();

            resource.add_link(NamedLink::new(rule.name(), Link::new(url)));
        }
        Ok(())
    }
}

// Later sources override earlier ones by name; the first occurrence keeps
// its position. Parameter names are compared case-sensitively, unlike
// resource property names.
fn merge_parameter(parameters: &mut Vec<(String, Value)>, name: String, value: Value) {
    match parameters.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, existing_value)) => *existing_value = value,
        None => parameters.push((name, value)),
    }
}

/// Lazy stream of wrapped resources.
///
/// Items are only wrapped as the stream is consumed; restarting requires a
/// restartable underlying sequence. Yields `Err` for the item that failed
/// and keeps the failure local to that element.
pub struct ResourceStream<'a, T: 'static, I> {
    compiled: CompiledPolicy<T>,
    items: I,
    resolver: Option<&'a dyn ActionResolver>,
}

impl<'a, T, I> Iterator for ResourceStream<'a, T, I>
where
    T: Serialize + 'static,
    I: Iterator<Item = &'a T>,
{
    type Item = Result<Resource>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        Some(self.compiled.wrap(item, self.resolver))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Wrap one object with a policy.
///
/// Compiles the policy for this single call; callers wrapping repeatedly
/// with the same policy should compile once via
/// [`WrapPolicy::compile`] and reuse the [`CompiledPolicy`].
pub fn wrap<T: Serialize + 'static>(
    obj: &T,
    policy: &WrapPolicy<T>,
    resolver: Option<&dyn ActionResolver>,
) -> Result<Resource> {
    policy.compile()?.wrap(obj, resolver)
}

/// Wrap a sequence of objects lazily with a shared, once-compiled policy.
///
/// Name-resolution failures surface here, before any item is consumed.
pub fn wrap_all<'a, T, I>(
    items: I,
    policy: &WrapPolicy<T>,
    resolver: Option<&'a dyn ActionResolver>,
) -> Result<ResourceStream<'a, T, I::IntoIter>>
where
    T: Serialize + 'static,
    I: IntoIterator<Item = &'a T>,
{
    Ok(policy.compile()?.wrap_all(items, resolver))
}

/// Wrap a collection into one envelope resource with its items embedded.
///
/// The envelope comes from applying the collection-level policy to the
/// collection value itself; each item is wrapped with the content policy
/// and embedded in source order.
pub fn wrap_collection<C, T>(
    collection: &C,
    policy: &CollectionWrapPolicy<C, T>,
    resolver: Option<&dyn ActionResolver>,
) -> Result<Resource>
where
    C: Serialize + 'static,
    T: Serialize + 'static,
    for<'i> &'i C: IntoIterator<Item = &'i T>,
{
    let mut envelope = wrap(collection, policy.collection_policy(), resolver)?;

    let children = wrap_all(collection, policy.content_policy(), resolver)?;
    for child in children {
        envelope.embed(child?);
    }

    Ok(envelope)
}
