//! Expression evaluation
//!
//! Evaluation uses serde as the reflection substitute: the wrapped instance
//! is serialized to a `serde_json::Value` once per wrap call and member
//! chains are walked over that value. Member names in expressions are
//! therefore the serde-visible field names of the wrapped type.

use crate::error::{Result, WrapError};
use crate::expr::ast::{Expr, ParamExpr};
use crate::expr::introspect::params_of_type;
use serde_json::Value;
use std::any::TypeId;
use std::borrow::Cow;

/// Evaluation environment: at most one bound parameter, the wrapped
/// instance, identified by its declared type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env<'a> {
    instance: Option<(TypeId, &'a Value)>,
}

impl<'a> Env<'a> {
    /// Environment with nothing bound; constants still evaluate
    pub fn empty() -> Self {
        Self::default()
    }

    /// Environment binding the serialized instance of type `T`
    pub fn for_instance<T: 'static>(value: &'a Value) -> Self {
        Self {
            instance: Some((TypeId::of::<T>(), value)),
        }
    }

    /// The bound instance value, if any
    pub fn instance_value(&self) -> Option<&'a Value> {
        self.instance.map(|(_, value)| value)
    }

    fn lookup(&self, param: &ParamExpr) -> Option<&'a Value> {
        match self.instance {
            Some((type_id, value)) if type_id == param.type_id => Some(value),
            _ => None,
        }
    }
}

/// Evaluate an expression in the given environment.
pub fn eval(expr: &Expr, env: &Env<'_>) -> Result<Value> {
    eval_inner(expr, env).map(Cow::into_owned)
}

fn eval_inner<'e>(expr: &'e Expr, env: &Env<'e>) -> Result<Cow<'e, Value>> {
    match expr {
        Expr::Constant(value) => Ok(Cow::Borrowed(value)),
        Expr::Param(param) => match env.lookup(param) {
            Some(value) => Ok(Cow::Borrowed(value)),
            None => Err(WrapError::Evaluation(format!(
                "unbound parameter '{}' of type {}",
                param.name, param.type_name
            ))),
        },
        Expr::Member { target, name } => member_of(eval_inner(target, env)?, name),
        Expr::Call(call) => Err(WrapError::Evaluation(format!(
            "cannot evaluate a call to '{}' outside link resolution",
            call.method
        ))),
    }
}

fn member_of<'e>(target: Cow<'e, Value>, name: &str) -> Result<Cow<'e, Value>> {
    match target {
        Cow::Borrowed(Value::Object(map)) => match map.get(name) {
            Some(value) => Ok(Cow::Borrowed(value)),
            None => Err(missing_member(name)),
        },
        Cow::Owned(Value::Object(mut map)) => match map.remove(name) {
            Some(value) => Ok(Cow::Owned(value)),
            None => Err(missing_member(name)),
        },
        other => Err(WrapError::Evaluation(format!(
            "member '{}' accessed on non-object value of kind {}",
            name,
            value_kind(&other)
        ))),
    }
}

pub(crate) fn missing_member(name: &str) -> WrapError {
    WrapError::Evaluation(format!(
        "no member '{}' on the serialized instance; member names must match serde field names",
        name
    ))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A link-rule call argument after one-time classification.
///
/// Classification happens when the rule is built: arguments with no free
/// reference to the wrapped-instance type are folded to a constant there
/// and then reused for every wrapped object; the rest are re-evaluated per
/// instance.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundArg {
    /// Evaluated once at rule-build time
    Constant(Value),
    /// Depends on the wrapped instance; evaluated per object
    PerInstance(Expr),
}

impl BoundArg {
    /// Classify an argument expression against the wrapped-instance type.
    ///
    /// A constant-shaped argument that fails to fold (e.g. a member access
    /// on a non-object literal) is kept unevaluated so the failure surfaces
    /// at wrap time, with the other lazy expression errors.
    pub fn classify(expr: &Expr, instance_type: TypeId) -> Self {
        if params_of_type(expr, instance_type).is_empty() {
            match eval(expr, &Env::empty()) {
                Ok(value) => BoundArg::Constant(value),
                Err(_) => BoundArg::PerInstance(expr.clone()),
            }
        } else {
            BoundArg::PerInstance(expr.clone())
        }
    }

    /// The argument value for the given environment
    pub fn value(&self, env: &Env<'_>) -> Result<Value> {
        match self {
            BoundArg::Constant(value) => Ok(value.clone()),
            BoundArg::PerInstance(expr) => eval(expr, env),
        }
    }
}
