//! Static analysis of expression trees
//!
//! Nothing here evaluates anything; these walks only look at the shape of
//! an expression.

use crate::error::{Result, WrapError};
use crate::expr::ast::{Expr, ParamExpr};
use std::any::TypeId;

/// Extract the member names of a pure access chain rooted at a parameter,
/// ordered from the root access outward.
///
/// Returns `None` when the body contains anything other than member
/// accesses over a single parameter, or no member access at all.
pub fn member_chain(body: &Expr) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current = body;
    loop {
        match current {
            Expr::Member { target, name } => {
                segments.push(name.as_str());
                current = target;
            }
            Expr::Param(_) if !segments.is_empty() => {
                segments.reverse();
                return Some(segments);
            }
            _ => return None,
        }
    }
}

/// Derive an output property name from a getter body.
///
/// The accessed member names are concatenated with no separator, from the
/// root access outward: `instance.Customer.Name` yields `"CustomerName"`.
pub fn resolve_name(body: &Expr) -> Result<String> {
    match member_chain(body) {
        Some(segments) => Ok(segments.concat()),
        None => Err(WrapError::NameInference(format!(
            "getter body of kind '{}' is not a pure member access chain over the instance",
            body.kind()
        ))),
    }
}

/// Collect every free parameter reference of the given type, in encounter
/// order.
pub fn params_of_type(expr: &Expr, type_id: TypeId) -> Vec<&ParamExpr> {
    let mut found = Vec::new();
    collect_params(expr, type_id, &mut found);
    found
}

/// Collect every free parameter reference declared as type `T`
pub fn params_of<T: 'static>(expr: &Expr) -> Vec<&ParamExpr> {
    params_of_type(expr, TypeId::of::<T>())
}

fn collect_params<'e>(expr: &'e Expr, type_id: TypeId, found: &mut Vec<&'e ParamExpr>) {
    match expr {
        Expr::Param(param) => {
            if param.type_id == type_id {
                found.push(param);
            }
        }
        Expr::Constant(_) => {}
        Expr::Member { target, .. } => collect_params(target, type_id, found),
        Expr::Call(call) => {
            collect_params(&call.target, type_id, found);
            for arg in &call.args {
                collect_params(&arg.value, type_id, found);
            }
        }
    }
}
