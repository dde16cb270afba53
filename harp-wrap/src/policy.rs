//! Wrap policies and the fluent builder
//!
//! A [`WrapPolicy`] is an immutable snapshot: every builder operation
//! consumes its input and returns a new value, so a policy held by one
//! caller can never be changed by another. Snapshots are cheap to clone
//! (rules share their closures through `Arc`) and are safe to cache and
//! share across threads.
//!
//! Rule modifiers apply to "the rule most recently started", so the
//! builder is two-phase: [`property`](WrapPolicy::property) and
//! [`link`](WrapPolicy::link) return a pending-rule builder distinct from
//! the policy type, and [`build`](PropertyRuleBuilder::build) (or starting
//! the next rule) folds the pending rule into a new snapshot.

use crate::compiled::CompiledPolicy;
use crate::error::Result;
use crate::expr::{ActionCall, Getter};
use crate::rules::{LinkRule, PropertyWrap};
use serde_json::Value;

/// Declarative description of how to project a `T` into a resource.
pub struct WrapPolicy<T> {
    use_camel_case: bool,
    linking_rules: Vec<LinkRule<T>>,
    wrapping_rules: Vec<PropertyWrap<T>>,
}

impl<T: 'static> WrapPolicy<T> {
    /// Empty policy: no rules, camel-casing off
    pub fn new() -> Self {
        Self {
            use_camel_case: false,
            linking_rules: Vec::new(),
            wrapping_rules: Vec::new(),
        }
    }

    /// New snapshot with camel-cased inferred property names
    pub fn with_camel_case(mut self) -> Self {
        self.use_camel_case = true;
        self
    }

    /// Whether inferred property names are camel-cased
    pub fn use_camel_case(&self) -> bool {
        self.use_camel_case
    }

    /// Link rules in declaration order
    pub fn linking_rules(&self) -> &[LinkRule<T>] {
        &self.linking_rules
    }

    /// Property rules in declaration order
    pub fn wrapping_rules(&self) -> &[PropertyWrap<T>] {
        &self.wrapping_rules
    }

    /// Start a property rule from a symbolic getter
    pub fn property(self, getter: Getter<T>) -> PropertyRuleBuilder<T> {
        PropertyRuleBuilder {
            policy: self,
            rule: PropertyWrap::new(getter),
        }
    }

    /// Start a link rule from a captured action call
    pub fn link(self, call: ActionCall<T>) -> LinkRuleBuilder<T> {
        LinkRuleBuilder {
            policy: self,
            rule: LinkRule::from_action(call),
        }
    }

    /// Append an already-built property rule, bypassing the pending-rule
    /// builder
    pub fn with_property_rule(self, rule: PropertyWrap<T>) -> Self {
        self.push_property(rule)
    }

    /// Append an already-built link rule, bypassing the pending-rule
    /// builder. This is the entry point for rules built with
    /// [`LinkRule::from_parts`] or [`LinkRule::from_expr`].
    pub fn with_link_rule(self, rule: LinkRule<T>) -> Self {
        self.push_link(rule)
    }

    /// Pair this policy (as the envelope) with a content policy for
    /// wrapping collections with embedded items
    pub fn embed_content_using<TContent: 'static>(
        self,
        content_policy: WrapPolicy<TContent>,
    ) -> CollectionWrapPolicy<T, TContent> {
        CollectionWrapPolicy::new(self, content_policy)
    }

    /// Precompute property names and getters into a caller-owned
    /// [`CompiledPolicy`]
    pub fn compile(&self) -> Result<CompiledPolicy<T>> {
        CompiledPolicy::of(self)
    }

    fn push_property(mut self, rule: PropertyWrap<T>) -> Self {
        self.wrapping_rules.push(rule);
        self
    }

    fn push_link(mut self, rule: LinkRule<T>) -> Self {
        self.linking_rules.push(rule);
        self
    }
}

impl<T: 'static> Default for WrapPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for WrapPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            use_camel_case: self.use_camel_case,
            linking_rules: self.linking_rules.clone(),
            wrapping_rules: self.wrapping_rules.clone(),
        }
    }
}

impl<T> std::fmt::Debug for WrapPolicy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapPolicy")
            .field("use_camel_case", &self.use_camel_case)
            .field("linking_rules", &self.linking_rules)
            .field("wrapping_rules", &self.wrapping_rules)
            .finish()
    }
}

/// Iterating a policy yields its property rules in declaration order.
impl<'a, T> IntoIterator for &'a WrapPolicy<T> {
    type Item = &'a PropertyWrap<T>;
    type IntoIter = std::slice::Iter<'a, PropertyWrap<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.wrapping_rules.iter()
    }
}

/// A policy plus a pending, not-yet-committed property rule.
pub struct PropertyRuleBuilder<T> {
    policy: WrapPolicy<T>,
    rule: PropertyWrap<T>,
}

impl<T: 'static> PropertyRuleBuilder<T> {
    /// Set the pending rule's explicit output name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.rule = self.rule.with_name(name);
        self
    }

    /// Commit the pending rule and start the next property rule
    pub fn property(self, getter: Getter<T>) -> PropertyRuleBuilder<T> {
        self.build().property(getter)
    }

    /// Commit the pending rule and start a link rule
    pub fn link(self, call: ActionCall<T>) -> LinkRuleBuilder<T> {
        self.build().link(call)
    }

    /// Commit the pending rule and pair the result with a content policy
    pub fn embed_content_using<TContent: 'static>(
        self,
        content_policy: WrapPolicy<TContent>,
    ) -> CollectionWrapPolicy<T, TContent> {
        self.build().embed_content_using(content_policy)
    }

    /// Commit the pending rule, producing the policy snapshot
    pub fn build(self) -> WrapPolicy<T> {
        self.policy.push_property(self.rule)
    }
}

impl<T: 'static> From<PropertyRuleBuilder<T>> for WrapPolicy<T> {
    fn from(builder: PropertyRuleBuilder<T>) -> Self {
        builder.build()
    }
}

/// A policy plus a pending, not-yet-committed link rule.
pub struct LinkRuleBuilder<T> {
    policy: WrapPolicy<T>,
    rule: LinkRule<T>,
}

impl<T: 'static> LinkRuleBuilder<T> {
    /// Set the pending rule's relation name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.rule = self.rule.with_name(name);
        self
    }

    /// Set the pending rule's inclusion predicate (replaces any previous)
    pub fn when(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.rule = self.rule.with_predicate(predicate);
        self
    }

    /// Set the pending rule's literal query parameters (replaces any
    /// previous)
    pub fn with_parameters<K, V>(mut self, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.rule = self.rule.with_parameters(
            parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Set the pending rule's per-instance query-parameter callback
    /// (replaces any previous)
    pub fn with_parameters_from(
        mut self,
        callback: impl Fn(&T) -> Vec<(String, Value)> + Send + Sync + 'static,
    ) -> Self {
        self.rule = self.rule.with_parameters_fn(callback);
        self
    }

    /// Commit the pending rule and start a property rule
    pub fn property(self, getter: Getter<T>) -> PropertyRuleBuilder<T> {
        self.build().property(getter)
    }

    /// Commit the pending rule and start the next link rule
    pub fn link(self, call: ActionCall<T>) -> LinkRuleBuilder<T> {
        self.build().link(call)
    }

    /// Commit the pending rule and pair the result with a content policy
    pub fn embed_content_using<TContent: 'static>(
        self,
        content_policy: WrapPolicy<TContent>,
    ) -> CollectionWrapPolicy<T, TContent> {
        self.build().embed_content_using(content_policy)
    }

    /// Commit the pending rule, producing the policy snapshot
    pub fn build(self) -> WrapPolicy<T> {
        self.policy.push_link(self.rule)
    }
}

impl<T: 'static> From<LinkRuleBuilder<T>> for WrapPolicy<T> {
    fn from(builder: LinkRuleBuilder<T>) -> Self {
        builder.build()
    }
}

/// An envelope policy over a collection type paired with a content policy
/// over its item type.
pub struct CollectionWrapPolicy<TCollection, TContent> {
    collection_policy: WrapPolicy<TCollection>,
    content_policy: WrapPolicy<TContent>,
}

impl<TCollection: 'static, TContent: 'static> CollectionWrapPolicy<TCollection, TContent> {
    /// Pair an envelope policy with a content policy
    pub fn new(
        collection_policy: WrapPolicy<TCollection>,
        content_policy: WrapPolicy<TContent>,
    ) -> Self {
        Self {
            collection_policy,
            content_policy,
        }
    }

    /// Policy applied to the collection value itself
    pub fn collection_policy(&self) -> &WrapPolicy<TCollection> {
        &self.collection_policy
    }

    /// Policy applied to each item
    pub fn content_policy(&self) -> &WrapPolicy<TContent> {
        &self.content_policy
    }
}

impl<TCollection, TContent> Clone for CollectionWrapPolicy<TCollection, TContent> {
    fn clone(&self) -> Self {
        Self {
            collection_policy: self.collection_policy.clone(),
            content_policy: self.content_policy.clone(),
        }
    }
}

impl<TCollection, TContent> std::fmt::Debug for CollectionWrapPolicy<TCollection, TContent> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionWrapPolicy")
            .field("collection_policy", &self.collection_policy)
            .field("content_policy", &self.content_policy)
            .finish()
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
        total: i64,
    }

    struct OrdersController;

    #[test]
    fn test_new_policy_is_empty() {
        let policy = WrapPolicy::<Order>::new();

        assert!(!policy.use_camel_case());
        assert!(policy.linking_rules().is_empty());
        assert!(policy.wrapping_rules().is_empty());
    }

    #[test]
    fn test_with_camel_case_sets_flag_only() {
        let policy = WrapPolicy::<Order>::new().with_camel_case();

        assert!(policy.use_camel_case());
        assert!(policy.linking_rules().is_empty());
        assert!(policy.wrapping_rules().is_empty());
    }

    #[test]
    fn test_property_rule_committed_on_build() {
        let getter = getter!(Order => Reference);
        let policy = WrapPolicy::<Order>::new().property(getter.clone()).build();

        assert_eq!(policy.wrapping_rules().len(), 1);
        assert_eq!(policy.wrapping_rules()[0].name(), None);
        assert_eq!(policy.wrapping_rules()[0].getter(), &getter);
    }

    #[test]
    fn test_named_replaces_pending_name() {
        let policy = WrapPolicy::<Order>::new()
            .property(getter!(Order => Reference))
            .named("ref")
            .named("reference_number")
            .build();

        assert_eq!(
            policy.wrapping_rules()[0].name(),
            Some("reference_number")
        );
    }

    #[test]
    fn test_chained_properties_all_committed() {
        let first = getter!(Order => Reference);
        let second = getter!(Order => Total);

        let policy: WrapPolicy<Order> = WrapPolicy::new()
            .property(first.clone())
            .property(second.clone())
            .into();

        let getters: Vec<_> = policy.wrapping_rules().iter().map(|r| r.getter()).collect();
        assert_eq!(getters, vec![&first, &second]);
    }

    #[test]
    fn test_iterating_policy_yields_property_rules_in_order() {
        let policy = WrapPolicy::<Order>::new()
            .property(getter!(Order => Reference))
            .property(getter!(Order => Total))
            .build();

        let names: Vec<_> = (&policy)
            .into_iter()
            .map(|r| r.output_name(false).unwrap())
            .collect();
        assert_eq!(names, vec!["Reference", "Total"]);
    }

    #[test]
    fn test_link_then_property_commits_link() {
        let policy = WrapPolicy::<Order>::new()
            .link(ActionCall::<Order>::to::<OrdersController>("find"))
            .property(getter!(Order => Reference))
            .build();

        assert_eq!(policy.linking_rules().len(), 1);
        assert_eq!(policy.wrapping_rules().len(), 1);
        assert_eq!(policy.linking_rules()[0].name(), "find");
    }

    #[test]
    fn test_link_modifiers_amend_pending_rule() {
        let policy = WrapPolicy::<Order>::new()
            .link(
                ActionCall::<Order>::to::<OrdersController>("find")
                    .arg("reference", ArgExpr::instance().member("Reference")),
            )
            .named("self")
            .when(|order| order.total > 0)
            .with_parameters([("format", "short")])
            .build();

        let rule = &policy.linking_rules()[0];
        assert_eq!(rule.name(), "self");
        assert_eq!(
            rule.query_parameters(),
            &[("format".to_string(), json!("short"))]
        );
        assert!(!rule.applies_to(&Order {
            reference: "A-1".to_string(),
            total: 0,
        }));
    }

    #[test]
    fn test_snapshots_are_independent() {
        let base = WrapPolicy::<Order>::new()
            .property(getter!(Order => Reference))
            .build();

        let extended = base.clone().property(getter!(Order => Total)).build();

        assert_eq!(base.wrapping_rules().len(), 1);
        assert_eq!(extended.wrapping_rules().len(), 2);
    }

    #[test]
    fn test_collection_policy_pairs_envelope_and_content() {
        let pair = WrapPolicy::<Vec<Order>>::new()
            .embed_content_using(WrapPolicy::<Order>::new().property(getter!(Order => Reference)).build());

        assert!(pair.collection_policy().wrapping_rules().is_empty());
        assert_eq!(pair.content_policy().wrapping_rules().len(), 1);
    }

    #[test]
    fn test_embed_content_from_pending_builder_commits_first() {
        let pair = WrapPolicy::<Vec<Order>>::new()
            .property(Getter::<Vec<Order>>::from_expr(
                crate::expr::Expr::Constant(json!(2)),
            ))
            .named("Count")
            .embed_content_using(WrapPolicy::<Order>::new());

        assert_eq!(pair.collection_policy().wrapping_rules().len(), 1);
    }
}
