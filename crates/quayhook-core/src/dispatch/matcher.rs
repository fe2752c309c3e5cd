use crate::domain::{
    IncomingEvent,
    ServiceRule,
};

/// A rule applies when its repository equals the event's repository and its
/// conditions pattern finds at least one non-empty match in the reference.
pub fn rule_matches(rule: &ServiceRule, event: &IncomingEvent) -> bool {
    rule.repository() == event.repository
        && rule
            .conditions()
            .find_iter(&event.reference)
            .any(|m| !m.is_empty())
}

/// Lazily yields every applicable rule in configuration order.
pub fn match_rules<'a>(
    event: &'a IncomingEvent, rules: &'a [ServiceRule],
) -> impl Iterator<Item = &'a ServiceRule> + 'a {
    rules.iter().filter(move |rule| rule_matches(rule, event))
}
