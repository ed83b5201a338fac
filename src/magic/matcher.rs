//! Continuation match engine.
//!
//! Walks the rule table in file order. A top-level rule that fails skips
//! its whole continuation span. A top-level rule that matches opens a chain:
//! its continuations are evaluated while they stay within one level of the
//! deepest match so far, and every matching rule with a description
//! replaces the tentative answer. A chain that never records a description
//! is not an answer and the scan moves on.

use crate::core::{MagicResult, MagicRule};
use crate::magic::eval::evaluate;
use crate::magic::table::RuleTable;
use tracing::trace;

impl RuleTable {
    /// First rule chain matching `buf`, as a full-accuracy result.
    pub fn find_match(&self, buf: &[u8]) -> Option<MagicResult> {
        self.find_match_with(buf, &mut |_| {})
    }

    /// Like [`RuleTable::find_match`], calling `observer` for every rule
    /// actually evaluated against the buffer.
    pub fn find_match_with(
        &self,
        buf: &[u8],
        observer: &mut dyn FnMut(&MagicRule),
    ) -> Option<MagicResult> {
        let rules = self.rules();
        let mut top = 0;

        while top < rules.len() {
            let chain_end = self.span_end(top);
            if !test_rule(&rules[top], buf, observer) {
                top = chain_end;
                continue;
            }

            let mut description = non_empty(&rules[top].description);
            // Deepest level currently eligible for evaluation.
            let mut eligible = 1u16;
            let mut i = top + 1;
            while i < chain_end {
                let rule = &rules[i];
                if rule.level > eligible {
                    i += 1;
                    continue;
                }
                eligible = rule.level;
                if test_rule(rule, buf, observer) {
                    if let Some(d) = non_empty(&rule.description) {
                        description = Some(d);
                    }
                    eligible = rule.level + 1;
                    i += 1;
                } else {
                    i = self.span_end(i);
                }
            }

            if let Some(d) = description {
                trace!(line = rules[top].line, mime = d, "Rule chain matched");
                return Some(MagicResult::certain(d));
            }
            top = chain_end;
        }
        None
    }
}

fn test_rule(rule: &MagicRule, buf: &[u8], observer: &mut dyn FnMut(&MagicRule)) -> bool {
    observer(rule);
    let matched = evaluate(rule, buf);
    trace!(line = rule.line, rule = %rule, matched, "Evaluated rule");
    matched
}

fn non_empty(description: &str) -> Option<&str> {
    let d = description.trim();
    (!d.is_empty()).then_some(d)
}
