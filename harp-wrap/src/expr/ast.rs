//! Expression tree

use serde_json::Value;
use std::any::TypeId;

/// A free parameter reference, tagged with the declared parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExpr {
    /// Parameter name
    pub name: &'static str,
    /// Declared type of the parameter
    pub type_id: TypeId,
    /// Human-readable form of the declared type, for diagnostics
    pub type_name: &'static str,
}

impl ParamExpr {
    /// A parameter of type `T` with the given name
    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// A symbolic expression over some wrapped instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a free parameter
    Param(ParamExpr),
    /// Literal value
    Constant(Value),
    /// Member access on a target expression
    Member {
        /// Expression the member is accessed on
        target: Box<Expr>,
        /// Declared member name (serde-visible field name)
        name: String,
    },
    /// Method call with named arguments
    Call(CallExpr),
}

/// A single direct method invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Expression the method is invoked on
    pub target: Box<Expr>,
    /// Invoked method name
    pub method: String,
    /// Arguments bound to the method's formal parameter names
    pub args: Vec<NamedArg>,
}

/// An argument expression paired with its formal parameter name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    /// Formal parameter name
    pub name: String,
    /// Argument expression
    pub value: Expr,
}

impl Expr {
    /// Access a member on this expression
    pub fn member(self, name: impl Into<String>) -> Expr {
        Expr::Member {
            target: Box::new(self),
            name: name.into(),
        }
    }

    /// View this expression as a method call, if it is one
    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Short description of the expression shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Param(_) => "parameter",
            Expr::Constant(_) => "constant",
            Expr::Member { .. } => "member access",
            Expr::Call(_) => "method call",
        }
    }
}
