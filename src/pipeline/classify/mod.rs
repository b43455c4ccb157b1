//! Block classifier: an ordered table of pure rules, first match wins.
//!
//! Each rule looks at one block (plus the block after it, for recoveries written
//! on their own line) and either declines or emits steps. Two orderings exist:
//! [`RuleSet::session_note`] for the multi-line coach notes and
//! [`RuleSet::activity`] for the short imperative cells of the schedule.

pub mod activity_rules;
pub mod note_rules;
pub mod patterns;

use metrics::counter;
use tracing::debug;

use crate::domain::{StepSpec, Zone};

/// What a rule knows beyond the block itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    pub purpose: String,
    /// Warmup/cooldown markers carry the explicit 10m Z2 detail
    pub interval_type: bool,
    /// Zone for steady segments whose own text names none
    pub fallback_zone: Option<Zone>,
    /// Whole activity cell, title included; empty for session notes
    pub activity_text: String,
}

/// A block under classification
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub block: &'a str,
    /// One-block lookahead
    pub next: Option<&'a str>,
    pub ctx: &'a ClassifyContext,
}

/// Steps emitted by a rule and how many blocks it used up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub steps: Vec<StepSpec>,
    pub consumed: usize,
}

impl RuleMatch {
    pub fn steps(steps: Vec<StepSpec>) -> Self {
        Self { steps, consumed: 1 }
    }

    pub fn step(step: StepSpec) -> Self {
        Self::steps(vec![step])
    }

    /// The rule also swallowed the following block
    pub fn with_lookahead(mut self) -> Self {
        self.consumed = 2;
        self
    }
}

pub type RuleFn = fn(&RuleInput<'_>) -> Option<RuleMatch>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

impl Rule {
    pub const fn new(name: &'static str, apply: RuleFn) -> Self {
        Self { name, apply }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Ordered rule table
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    /// Rules for session notes
    pub fn session_note() -> Self {
        Self::new("session_note", note_rules::rules())
    }

    /// Shorter ordering for schedule cells such as `Easy 50 mins + 4x10 secs strides`
    pub fn activity() -> Self {
        Self::new("activity", activity_rules::rules())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Insert a rule ahead of an existing one; appended when `before` is unknown.
    pub fn insert_before(&mut self, before: &str, rule: Rule) {
        match self.rules.iter().position(|existing| existing.name == before) {
            Some(index) => self.rules.insert(index, rule),
            None => self.rules.push(rule),
        }
    }

    /// First matching rule for one block, with the rule's name
    pub fn classify_block(&self, input: &RuleInput<'_>) -> Option<(&'static str, RuleMatch)> {
        self.rules
            .iter()
            .find_map(|rule| (rule.apply)(input).map(|matched| (rule.name, matched)))
    }

    /// Classify every block in order. Unmatched blocks are dropped; nothing here fails.
    pub fn classify(&self, blocks: &[String], ctx: &ClassifyContext) -> Vec<StepSpec> {
        let mut steps = Vec::new();
        let mut cursor = 0;

        while cursor < blocks.len() {
            let input = RuleInput {
                block: &blocks[cursor],
                next: blocks.get(cursor + 1).map(String::as_str),
                ctx,
            };

            match self.classify_block(&input) {
                Some((rule, matched)) => {
                    debug!(rules = self.name, rule, block = input.block, "block classified");
                    counter!("plan_rule_matches_total", "rule" => rule).increment(1);
                    steps.extend(matched.steps);
                    cursor += matched.consumed.max(1);
                }
                None => {
                    debug!(rules = self.name, block = input.block, "block dropped");
                    counter!("plan_blocks_dropped_total").increment(1);
                    cursor += 1;
                }
            }
        }

        steps
    }
}

/// Prepend a warmup and append a cooldown unless the steps already carry them
pub fn wrap_with_markers(steps: Vec<StepSpec>, detail: bool) -> Vec<StepSpec> {
    let has_warmup = steps.iter().any(StepSpec::is_warmup);
    let has_cooldown = steps.iter().any(StepSpec::is_cooldown);

    let mut wrapped = Vec::with_capacity(steps.len() + 2);
    if !has_warmup {
        wrapped.push(StepSpec::Warmup { detail });
    }
    wrapped.extend(steps);
    if !has_cooldown {
        wrapped.push(StepSpec::Cooldown { detail });
    }
    wrapped
}
