//! Typed construction facades
//!
//! [`Getter`], [`ArgExpr`] and [`ActionCall`] build well-formed expression
//! trees while keeping the wrapped-object type in their signatures, so a
//! policy over `Order` can only be fed expressions over `Order`.

use crate::expr::ast::{CallExpr, Expr, NamedArg, ParamExpr};
use serde_json::Value;
use std::marker::PhantomData;

/// Conventional name of the wrapped-instance parameter
pub const INSTANCE_PARAM: &str = "instance";
/// Conventional name of the controller parameter in captured action calls
pub const CONTROLLER_PARAM: &str = "controller";

/// Suffix stripped from controller marker type names by default
pub const DEFAULT_CONTROLLER_SUFFIX: &str = "Controller";

/// A symbolic property accessor over `T`.
pub struct Getter<T> {
    body: Expr,
    _marker: PhantomData<fn(&T)>,
}

impl<T: 'static> Getter<T> {
    /// A member-access chain over the instance parameter.
    ///
    /// Segments are serde-visible field names; `["Customer", "Name"]`
    /// stands for `instance.Customer.Name`.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut body = Expr::Param(ParamExpr::of::<T>(INSTANCE_PARAM));
        for segment in segments {
            body = body.member(segment);
        }
        Self {
            body,
            _marker: PhantomData,
        }
    }

    /// A getter with an arbitrary body.
    ///
    /// Name inference only succeeds for pure member chains, so getters
    /// built this way usually need an explicit property name.
    pub fn from_expr(body: Expr) -> Self {
        Self {
            body,
            _marker: PhantomData,
        }
    }

    /// The getter body
    pub fn body(&self) -> &Expr {
        &self.body
    }
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Getter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Getter").field("body", &self.body).finish()
    }
}

impl<T> PartialEq for Getter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

/// Shorthand for a member-chain [`Getter`]:
/// `getter!(Order => Customer.Name)`.
#[macro_export]
macro_rules! getter {
    ($ty:ty => $($segment:ident).+) => {
        $crate::expr::Getter::<$ty>::from_segments([$(stringify!($segment)),+])
    };
}

/// A symbolic argument expression for a captured action call over `T`.
pub struct ArgExpr<T> {
    expr: Expr,
    _marker: PhantomData<fn(&T)>,
}

impl<T: 'static> ArgExpr<T> {
    /// The wrapped instance itself
    pub fn instance() -> Self {
        Self {
            expr: Expr::Param(ParamExpr::of::<T>(INSTANCE_PARAM)),
            _marker: PhantomData,
        }
    }

    /// A literal value, evaluated once when the link rule is built
    pub fn constant(value: impl Into<Value>) -> Self {
        Self {
            expr: Expr::Constant(value.into()),
            _marker: PhantomData,
        }
    }

    /// Access a member on the current expression
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.expr = self.expr.member(name);
        self
    }

    /// The underlying expression
    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

impl<T> Clone for ArgExpr<T> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ArgExpr<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgExpr").field("expr", &self.expr).finish()
    }
}

// Controller parameter type used when the caller names the target
// explicitly and no marker type exists.
struct ExplicitTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ControllerTarget {
    Explicit(String),
    Derived {
        type_name: &'static str,
        suffix: String,
    },
}

/// A captured action invocation: the target controller, the action name,
/// and named argument expressions.
pub struct ActionCall<T> {
    target: ControllerTarget,
    controller_param: ParamExpr,
    action: String,
    args: Vec<NamedArg>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: 'static> ActionCall<T> {
    /// Capture a call to `action` on the controller marker type `C`.
    ///
    /// The controller name is the last path segment of `C`'s type name
    /// with the `"Controller"` suffix stripped. A marker type without the
    /// suffix keeps its full name; use [`ActionCall::to_controller`] or
    /// [`ActionCall::strip_suffix`] when the convention does not fit.
    pub fn to<C: 'static>(action: impl Into<String>) -> Self {
        Self {
            target: ControllerTarget::Derived {
                type_name: std::any::type_name::<C>(),
                suffix: DEFAULT_CONTROLLER_SUFFIX.to_string(),
            },
            controller_param: ParamExpr::of::<C>(CONTROLLER_PARAM),
            action: action.into(),
            args: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Capture a call to `action` on an explicitly named controller
    pub fn to_controller(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            target: ControllerTarget::Explicit(controller.into()),
            controller_param: ParamExpr::of::<ExplicitTarget>(CONTROLLER_PARAM),
            action: action.into(),
            args: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Change the suffix stripped from a derived controller type name
    pub fn strip_suffix(mut self, suffix: impl Into<String>) -> Self {
        if let ControllerTarget::Derived { suffix: current, .. } = &mut self.target {
            *current = suffix.into();
        }
        self
    }

    /// Append a named argument
    pub fn arg(mut self, name: impl Into<String>, value: ArgExpr<T>) -> Self {
        self.args.push(NamedArg {
            name: name.into(),
            value: value.into_expr(),
        });
        self
    }

    /// The action name
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The resolved controller name
    pub fn controller_name(&self) -> String {
        match &self.target {
            ControllerTarget::Explicit(name) => name.clone(),
            ControllerTarget::Derived { type_name, suffix } => {
                derive_controller_name(type_name, suffix)
            }
        }
    }

    /// Build the captured call body: `controller.action(args...)`
    pub fn body(&self) -> Expr {
        Expr::Call(CallExpr {
            target: Box::new(Expr::Param(self.controller_param.clone())),
            method: self.action.clone(),
            args: self.args.clone(),
        })
    }
}

impl<T> Clone for ActionCall<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            controller_param: self.controller_param.clone(),
            action: self.action.clone(),
            args: self.args.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ActionCall<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCall")
            .field("target", &self.target)
            .field("action", &self.action)
            .field("args", &self.args)
            .finish()
    }
}

/// Derive a controller name from a (possibly path-qualified) type name.
pub(crate) fn derive_controller_name(type_name: &str, suffix: &str) -> String {
    let short = short_type_name(type_name);
    match short.strip_suffix(suffix) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => short.to_string(),
    }
}

fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::introspect::{params_of, resolve_name};
    use serde_json::json;

    struct Order;
    struct OrdersController;
    struct Routes;

    #[test]
    fn test_getter_from_segments() {
        let getter = Getter::<Order>::from_segments(["Customer", "Name"]);
        assert_eq!(resolve_name(getter.body()).unwrap(), "CustomerName");
    }

    #[test]
    fn test_getter_macro() {
        let getter = getter!(Order => Customer.Name);
        assert_eq!(getter, Getter::<Order>::from_segments(["Customer", "Name"]));
    }

    #[test]
    fn test_getter_root_param_is_instance_typed() {
        let getter = getter!(Order => Reference);
        assert_eq!(params_of::<Order>(getter.body()).len(), 1);
    }

    #[test]
    fn test_controller_name_from_marker_type() {
        let call = ActionCall::<Order>::to::<OrdersController>("find");
        assert_eq!(call.controller_name(), "Orders");
        assert_eq!(call.action(), "find");
    }

    #[test]
    fn test_controller_name_without_suffix_kept_intact() {
        let call = ActionCall::<Order>::to::<Routes>("find");
        assert_eq!(call.controller_name(), "Routes");
    }

    #[test]
    fn test_controller_suffix_configurable() {
        let call = ActionCall::<Order>::to::<Routes>("find").strip_suffix("Routes");
        // Stripping would leave an empty name; the full name is kept.
        assert_eq!(call.controller_name(), "Routes");

        let call = ActionCall::<Order>::to::<OrdersController>("find").strip_suffix("sController");
        assert_eq!(call.controller_name(), "Order");
    }

    #[test]
    fn test_explicit_controller() {
        let call = ActionCall::<Order>::to_controller("Legacy", "find");
        assert_eq!(call.controller_name(), "Legacy");
    }

    #[test]
    fn test_call_body_shape() {
        let call = ActionCall::<Order>::to::<OrdersController>("find")
            .arg("id", ArgExpr::instance().member("Id"))
            .arg("page", ArgExpr::constant(2));
        let body = call.body();

        let call_expr = body.as_call().expect("body is a call");
        assert_eq!(call_expr.method, "find");
        let names: Vec<_> = call_expr.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["id", "page"]);
        assert_eq!(call_expr.args[1].value, Expr::Constant(json!(2)));
    }

    #[test]
    fn test_generic_type_name_shortened() {
        assert_eq!(
            derive_controller_name("app::api::OrdersController", "Controller"),
            "Orders"
        );
        assert_eq!(
            derive_controller_name("app::Wrapper<app::OrdersController>", "Controller"),
            "Wrapper"
        );
    }
}
