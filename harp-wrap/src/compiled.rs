//! Caller-owned compiled policies
//!
//! Name resolution and the casing transform run once here instead of once
//! per wrapped object. A [`CompiledPolicy`] is an explicit value the caller
//! builds and keeps; there is no hidden process-wide cache, and compiling
//! never changes observable wrapping output.

use crate::error::Result;
use crate::expr::eval::{missing_member, value_kind};
use crate::expr::{member_chain, Env, Expr, Getter};
use crate::policy::WrapPolicy;
use crate::rules::LinkRule;
use crate::WrapError;
use serde_json::Value;
use smallvec::SmallVec;

/// A property getter ready for repeated invocation.
///
/// Pure member chains are reduced to their path segments and walked
/// directly over the serialized instance; any other body falls back to
/// general expression evaluation.
#[derive(Debug, Clone)]
pub struct CompiledGetter {
    kind: GetterKind,
}

#[derive(Debug, Clone)]
enum GetterKind {
    Path(SmallVec<[String; 4]>),
    General(Expr),
}

impl CompiledGetter {
    /// Compile a symbolic getter
    pub fn compile<T: 'static>(getter: &Getter<T>) -> Self {
        let kind = match member_chain(getter.body()) {
            Some(segments) => GetterKind::Path(
                segments.into_iter().map(|segment| segment.to_string()).collect(),
            ),
            None => GetterKind::General(getter.body().clone()),
        };
        Self { kind }
    }

    /// Produce the property value from the environment's bound instance
    pub fn invoke(&self, env: &Env<'_>) -> Result<Value> {
        match &self.kind {
            GetterKind::Path(segments) => {
                let mut current = env.instance_value().ok_or_else(|| {
                    WrapError::Internal("no serialized instance bound".to_string())
                })?;
                for segment in segments {
                    current = match current {
                        Value::Object(map) => {
                            map.get(segment).ok_or_else(|| missing_member(segment))?
                        }
                        other => {
                            return Err(WrapError::Evaluation(format!(
                                "member '{}' accessed on non-object value of kind {}",
                                segment,
                                value_kind(other)
                            )))
                        }
                    };
                }
                Ok(current.clone())
            }
            GetterKind::General(expr) => crate::expr::eval::eval(expr, env),
        }
    }
}

/// A policy with property names resolved and getters compiled, ready to be
/// reused across many wrap calls.
pub struct CompiledPolicy<T> {
    getters: Vec<(String, CompiledGetter)>,
    linking_rules: Vec<LinkRule<T>>,
}

impl<T: 'static> CompiledPolicy<T> {
    /// Compile a policy: resolve every property rule's output name (explicit
    /// name, else inferred chain name, camel-cased when the policy asks) and
    /// compile its getter, in declaration order.
    pub fn of(policy: &WrapPolicy<T>) -> Result<Self> {
        let mut getters = Vec::with_capacity(policy.wrapping_rules().len());
        for rule in policy {
            let name = rule.output_name(policy.use_camel_case())?;
            getters.push((name, CompiledGetter::compile(rule.getter())));
        }
        Ok(Self {
            getters,
            linking_rules: policy.linking_rules().to_vec(),
        })
    }

    /// Resolved output property names, in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.getters.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn getter_entries(&self) -> &[(String, CompiledGetter)] {
        &self.getters
    }

    pub(crate) fn link_rules(&self) -> &[LinkRule<T>] {
        &self.linking_rules
    }
}

impl<T> Clone for CompiledPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            getters: self.getters.clone(),
            linking_rules: self.linking_rules.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CompiledPolicy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPolicy")
            .field("getters", &self.getters)
            .field("linking_rules", &self.linking_rules)
            .finish()
    }
}
