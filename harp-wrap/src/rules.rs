//! Immutable wrapping rules
//!
//! A policy is an ordered set of these. Rules never change after
//! construction; the fluent builder replaces a pending rule wholesale
//! instead of mutating it.

use crate::error::{Result, WrapError};
use crate::expr::typed::{derive_controller_name, DEFAULT_CONTROLLER_SUFFIX};
use crate::expr::{ActionCall, BoundArg, CallExpr, Expr, Getter};
use crate::naming::to_camel_case;
use serde_json::Value;
use std::any::TypeId;
use std::sync::Arc;

type ParamsFn<T> = Arc<dyn Fn(&T) -> Vec<(String, Value)> + Send + Sync>;
type PredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Projects one property of the wrapped object into the resource.
pub struct PropertyWrap<T> {
    name: Option<String>,
    getter: Getter<T>,
}

impl<T: 'static> PropertyWrap<T> {
    /// Rule without an explicit name; the output name is inferred from the
    /// getter's member chain.
    pub fn new(getter: Getter<T>) -> Self {
        Self { name: None, getter }
    }

    /// Replace the explicit output name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The explicit output name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The symbolic getter
    pub fn getter(&self) -> &Getter<T> {
        &self.getter
    }

    /// Resolve the output property name.
    ///
    /// An explicit non-empty name always wins and is never transformed;
    /// otherwise the name is inferred from the getter chain and, when the
    /// policy asks for it, camel-cased.
    pub fn output_name(&self, use_camel_case: bool) -> Result<String> {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(explicit) => Ok(explicit.to_string()),
            None => {
                let inferred = crate::expr::resolve_name(self.getter.body())?;
                Ok(if use_camel_case {
                    to_camel_case(&inferred)
                } else {
                    inferred
                })
            }
        }
    }
}

impl<T> Clone for PropertyWrap<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            getter: self.getter.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PropertyWrap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyWrap")
            .field("name", &self.name)
            .field("getter", &self.getter)
            .finish()
    }
}

impl<T> PartialEq for PropertyWrap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.getter == other.getter
    }
}

/// Projects one hyperlink into the resource.
pub struct LinkRule<T> {
    name: String,
    controller_name: String,
    body: Expr,
    bound_args: Vec<(String, BoundArg)>,
    query_parameters: Vec<(String, Value)>,
    query_parameters_fn: Option<ParamsFn<T>>,
    predicate: Option<PredicateFn<T>>,
}

impl<T: 'static> LinkRule<T> {
    /// Rule from a typed action capture. The relation name defaults to the
    /// action name.
    pub fn from_action(call: ActionCall<T>) -> Self {
        let body = call.body();
        let bound_args = classify_args::<T>(&body);
        Self {
            name: call.action().to_string(),
            controller_name: call.controller_name(),
            body,
            bound_args,
            query_parameters: Vec::new(),
            query_parameters_fn: None,
            predicate: None,
        }
    }

    /// Rule from a raw captured expression.
    ///
    /// The body must be a single direct method call on the controller
    /// parameter; anything else is rejected here. The relation name is the
    /// invoked method name and the controller name is derived from the
    /// target parameter's type name.
    pub fn from_expr(body: Expr) -> Result<Self> {
        let call = body.as_call().ok_or_else(|| {
            WrapError::UnsupportedExpression(format!(
                "only a single direct method call is supported, got a {}",
                body.kind()
            ))
        })?;
        let controller_name = match call.target.as_ref() {
            Expr::Param(param) => {
                derive_controller_name(param.type_name, DEFAULT_CONTROLLER_SUFFIX)
            }
            other => {
                return Err(WrapError::UnsupportedExpression(format!(
                    "call target must be the controller parameter, got a {}",
                    other.kind()
                )))
            }
        };
        let name = call.method.clone();
        Self::from_parts(name, controller_name, body)
    }

    /// Unvalidated-body constructor.
    ///
    /// Accepts any body expression; a body that is not a method call makes
    /// the rule emit no link at wrap time. Relation and controller names
    /// must be non-empty.
    pub fn from_parts(
        name: impl Into<String>,
        controller_name: impl Into<String>,
        body: Expr,
    ) -> Result<Self> {
        let name = name.into();
        let controller_name = controller_name.into();
        if name.is_empty() {
            return Err(WrapError::Construction(
                "link relation name must not be empty".to_string(),
            ));
        }
        if controller_name.is_empty() {
            return Err(WrapError::Construction(
                "controller name must not be empty".to_string(),
            ));
        }
        let bound_args = classify_args::<T>(&body);
        Ok(Self {
            name,
            controller_name,
            body,
            bound_args,
            query_parameters: Vec::new(),
            query_parameters_fn: None,
            predicate: None,
        })
    }

    /// Replace the relation name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the literal query parameters
    pub fn with_parameters(mut self, parameters: Vec<(String, Value)>) -> Self {
        self.query_parameters = parameters;
        self
    }

    /// Replace the per-instance query-parameter callback
    pub fn with_parameters_fn(
        mut self,
        callback: impl Fn(&T) -> Vec<(String, Value)> + Send + Sync + 'static,
    ) -> Self {
        self.query_parameters_fn = Some(Arc::new(callback));
        self
    }

    /// Replace the inclusion predicate
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Relation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target controller name
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    /// The stored body expression
    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// The body as a method call, if it is one
    pub fn call(&self) -> Option<&CallExpr> {
        self.body.as_call()
    }

    /// Call arguments after one-time classification
    pub fn bound_args(&self) -> &[(String, BoundArg)] {
        &self.bound_args
    }

    /// Literal query parameters
    pub fn query_parameters(&self) -> &[(String, Value)] {
        &self.query_parameters
    }

    /// Whether the rule includes a link for this object (default: always)
    pub fn applies_to(&self, obj: &T) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(obj),
            None => true,
        }
    }

    /// Per-instance query parameters (default: none)
    pub fn callback_parameters(&self, obj: &T) -> Vec<(String, Value)> {
        match &self.query_parameters_fn {
            Some(callback) => callback(obj),
            None => Vec::new(),
        }
    }

    /// Whether any argument must be evaluated against the wrapped instance
    pub fn needs_instance(&self) -> bool {
        self.bound_args
            .iter()
            .any(|(_, arg)| matches!(arg, BoundArg::PerInstance(_)))
    }
}

impl<T> Clone for LinkRule<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            controller_name: self.controller_name.clone(),
            body: self.body.clone(),
            bound_args: self.bound_args.clone(),
            query_parameters: self.query_parameters.clone(),
            query_parameters_fn: self.query_parameters_fn.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> std::fmt::Debug for LinkRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkRule")
            .field("name", &self.name)
            .field("controller_name", &self.controller_name)
            .field("body", &self.body)
            .field("query_parameters", &self.query_parameters)
            .finish_non_exhaustive()
    }
}

fn classify_args<T: 'static>(body: &Expr) -> Vec<(String, BoundArg)> {
    match body.as_call() {
        Some(call) => call
            .args
            .iter()
            .map(|arg| {
                (
                    arg.name.clone(),
                    BoundArg::classify(&arg.value, TypeId::of::<T>()),
                )
            })
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ArgExpr;
    use crate::getter;
    use serde_json::json;

    #[derive(serde::Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Order {
        reference: String,
    }

    struct OrdersController;

    fn order(reference: &str) -> Order {
        Order {
            reference: reference.to_string(),
        }
    }

    #[test]
    fn test_property_rule_without_name() {
        let rule = PropertyWrap::new(getter!(Order => Reference));
        assert_eq!(rule.name(), None);
        assert_eq!(rule.output_name(false).unwrap(), "Reference");
    }

    #[test]
    fn test_property_rule_with_explicit_name() {
        let rule = PropertyWrap::new(getter!(Order => Reference)).with_name("ref");
        assert_eq!(rule.name(), Some("ref"));
        assert_eq!(rule.output_name(false).unwrap(), "ref");
    }

    #[test]
    fn test_explicit_name_bypasses_camel_case() {
        let rule = PropertyWrap::new(getter!(Order => Reference)).with_name("REF_No");
        assert_eq!(rule.output_name(true).unwrap(), "REF_No");
    }

    #[test]
    fn test_inferred_name_camel_cased() {
        let rule = PropertyWrap::new(getter!(Order => Reference));
        assert_eq!(rule.output_name(true).unwrap(), "reference");
    }

    #[test]
    fn test_empty_explicit_name_falls_back_to_inference() {
        let rule = PropertyWrap::new(getter!(Order => Reference)).with_name("");
        assert_eq!(rule.output_name(false).unwrap(), "Reference");
    }

    #[test]
    fn test_link_rule_defaults() {
        let rule = LinkRule::from_action(ActionCall::<Order>::to::<OrdersController>("find"));

        assert_eq!(rule.name(), "find");
        assert_eq!(rule.controller_name(), "Orders");
        assert!(rule.query_parameters().is_empty());
        assert!(rule.applies_to(&order("A-1")));
        assert!(rule.callback_parameters(&order("A-1")).is_empty());
    }

    #[test]
    fn test_link_rule_classifies_arguments_once() {
        let rule = LinkRule::from_action(
            ActionCall::<Order>::to::<OrdersController>("find")
                .arg("reference", ArgExpr::instance().member("Reference"))
                .arg("page", ArgExpr::constant(1)),
        );

        assert!(rule.needs_instance());
        assert_eq!(rule.bound_args()[1].1, BoundArg::Constant(json!(1)));
        assert!(matches!(rule.bound_args()[0].1, BoundArg::PerInstance(_)));
    }

    #[test]
    fn test_link_rule_modifiers_replace() {
        let rule = LinkRule::from_action(ActionCall::<Order>::to::<OrdersController>("find"))
            .with_name("self")
            .with_parameters(vec![("page".to_string(), json!(1))])
            .with_parameters(vec![("size".to_string(), json!(10))])
            .with_predicate(|_| false);

        assert_eq!(rule.name(), "self");
        // Second with_parameters replaced the first, no accumulation.
        assert_eq!(rule.query_parameters(), &[("size".to_string(), json!(10))]);
        assert!(!rule.applies_to(&order("A-1")));
    }

    #[test]
    fn test_from_expr_rejects_non_call_bodies() {
        let err = LinkRule::<Order>::from_expr(getter!(Order => Reference).body().clone())
            .unwrap_err();
        assert!(matches!(err, WrapError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_from_expr_derives_names() {
        let body = ActionCall::<Order>::to::<OrdersController>("find").body();
        let rule = LinkRule::<Order>::from_expr(body).unwrap();

        assert_eq!(rule.name(), "find");
        assert_eq!(rule.controller_name(), "Orders");
    }

    #[test]
    fn test_from_parts_rejects_empty_names() {
        let body = ActionCall::<Order>::to::<OrdersController>("find").body();
        assert!(matches!(
            LinkRule::<Order>::from_parts("", "Orders", body.clone()),
            Err(WrapError::Construction(_))
        ));
        assert!(matches!(
            LinkRule::<Order>::from_parts("find", "", body),
            Err(WrapError::Construction(_))
        ));
    }

    #[test]
    fn test_from_parts_accepts_non_call_body() {
        let rule =
            LinkRule::<Order>::from_parts("missing", "Orders", Expr::Constant(json!(null)))
                .unwrap();
        assert!(rule.call().is_none());
        assert!(rule.bound_args().is_empty());
    }
}
