//! The thought acceptance pipeline.
//!
//! A call is planned against a read-only view of the engine first: branch
//! switch, branch origin, position, totals and references are all checked
//! before anything is written. Only a fully valid plan is committed, so a
//! rejected call leaves every counter, table and the ledger untouched.

use std::collections::HashMap;
use std::env;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use cascade_config::{CascadeConfig, DISABLE_THOUGHT_LOGGING_ENV, thought_logging_disabled};
use cascade_tools::{RenderContext, render_thought, validate_thought_args};
use cascade_types::{
    AbsolutePosition, BranchId, BranchMetadata, BranchOrigin, DEFAULT_RECENT_LIMIT,
    FailureResponse, GapInfo, ResponseMode, SequenceId, SequenceMetadata, SequencePosition,
    Thought, ThoughtPreview, ThoughtRef, ThoughtRequest, ThoughtResponse,
};

use crate::branches::BranchTable;
use crate::compose::{Committed, Snapshot, compose};
use crate::error::EngineError;
use crate::gap::GapTracker;
use crate::ledger::Ledger;
use crate::resolve::Resolver;
use crate::sequences::{NewSequence, SequenceTable};

/// Thoughts before (and including) a branch origin copied into the new branch sequence.
const INHERITED_CONTEXT: usize = 10;

/// Minimum number of thoughts added when a caller asks for more.
const MIN_EXPANSION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Emit the boxed rendering of every accepted thought.
    pub log_thoughts: bool,
    /// Mode used when a call does not pick one.
    pub response_mode: ResponseMode,
    /// Recent-thought window used when a call does not override it.
    pub recent_limit: u8,
}

impl Default for EngineOptions {
    fn default() -> Self {
        let disabled = env::var(DISABLE_THOUGHT_LOGGING_ENV).ok();
        Self {
            log_thoughts: !thought_logging_disabled(disabled.as_deref()),
            response_mode: ResponseMode::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn from_config(config: &CascadeConfig) -> Self {
        Self {
            log_thoughts: config.thought_logging_enabled(),
            response_mode: config.response_mode().unwrap_or_default(),
            recent_limit: config
                .recent_thoughts_limit()
                .unwrap_or(DEFAULT_RECENT_LIMIT),
        }
    }
}

/// Result of one `cascade_thinking` call, as seen from the outside.
#[derive(Debug, Clone, PartialEq)]
pub enum ThoughtOutcome {
    Accepted(Box<ThoughtResponse>),
    Rejected(FailureResponse),
}

impl ThoughtOutcome {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Accepted(response) => serde_json::to_value(response),
            Self::Rejected(failure) => serde_json::to_value(failure),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Accepted(response) => serde_json::to_string_pretty(response),
            Self::Rejected(failure) => serde_json::to_string_pretty(failure),
        }
    }
}

/// Where the current sequence pointer goes when `switchToBranch` is honoured.
#[derive(Debug)]
struct Switch {
    sequence: Option<SequenceId>,
    branch: Option<BranchId>,
}

/// The resolved origin of a branch being founded.
#[derive(Debug)]
struct Origin {
    branch_id: BranchId,
    absolute: AbsolutePosition,
    sequence_position: SequencePosition,
    sequence_id: SequenceId,
    context: Vec<ThoughtPreview>,
}

/// Everything a call will change, computed without changing anything.
#[derive(Debug)]
struct Plan {
    switch: Option<Switch>,
    /// Existing sequence the thought joins, `None` when a new one is minted.
    sequence: Option<SequenceId>,
    new_summary: Option<String>,
    position: SequencePosition,
    total: u32,
    expanded: bool,
    revises: Option<AbsolutePosition>,
    origin: Option<Origin>,
    gap: Option<GapInfo>,
}

/// Owns every thought, sequence and branch for one caller.
#[derive(Debug)]
pub struct Engine {
    options: EngineOptions,
    ledger: Ledger,
    sequences: SequenceTable,
    branches: BranchTable,
    /// `None` while on main.
    active_branch: Option<BranchId>,
    gaps: GapTracker,
    isolated: HashMap<String, Engine>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    #[must_use]
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ledger: Ledger::default(),
            sequences: SequenceTable::default(),
            branches: BranchTable::default(),
            active_branch: None,
            gaps: GapTracker::default(),
            isolated: HashMap::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Entry point for raw tool arguments. Never panics on caller input.
    pub fn process_thought(&mut self, args: &Value) -> ThoughtOutcome {
        let result = validate_thought_args(args)
            .map_err(EngineError::from)
            .and_then(|request| self.process(request));
        match result {
            Ok(response) => ThoughtOutcome::Accepted(Box::new(response)),
            Err(err) => {
                tracing::debug!(error = %err, "thought rejected");
                ThoughtOutcome::Rejected(FailureResponse::new(err.to_string()))
            }
        }
    }

    pub fn process(&mut self, request: ThoughtRequest) -> Result<ThoughtResponse, EngineError> {
        if request.isolated_context
            && let Some(source) = request.source.clone()
        {
            let options = self.options.clone();
            let child = self.isolated.entry(source).or_insert_with(|| {
                tracing::debug!("creating isolated engine");
                Self::with_options(options)
            });
            return child.process(ThoughtRequest {
                isolated_context: false,
                ..request
            });
        }

        let plan = self.plan(&request)?;
        Ok(self.commit(request, plan))
    }

    fn plan(&self, request: &ThoughtRequest) -> Result<Plan, EngineError> {
        if request.switch_to_branch.is_some() && request.start_new_sequence {
            return Err(EngineError::MutuallyExclusiveOptions);
        }

        let switch = request
            .switch_to_branch
            .as_ref()
            .map(|target| self.plan_switch(target))
            .transpose()?;

        // Sequence-relative references answer to the sequence the caller will be
        // in after the switch, before any new sequence is minted.
        let view: Option<&SequenceMetadata> = match &switch {
            Some(Switch {
                sequence: Some(id), ..
            }) => self.sequences.get(id),
            _ => self.sequences.current(),
        };
        let resolver = Resolver::new(&self.ledger, view);

        let origin = match request.branch_from {
            Some(reference) => {
                let thought = resolver.resolve(reference)?;
                request.branch_id.as_ref().map(|id| Origin {
                    branch_id: id.clone(),
                    absolute: thought.absolute_position,
                    sequence_position: thought.sequence_position,
                    sequence_id: thought.sequence_id.clone(),
                    context: self
                        .ledger
                        .window_ending_at(thought.absolute_position, INHERITED_CONTEXT)
                        .iter()
                        .map(ThoughtPreview::of)
                        .collect(),
                })
            }
            None => None,
        };

        let force_new = request.start_new_sequence || origin.is_some();
        let sequence = view.filter(|_| !force_new);
        let expected = sequence.map_or(SequencePosition::new(1), |s| {
            SequencePosition::new(s.thought_count + 1)
        });

        let position = match request.position {
            Some(got) if request.is_default_source() && got != expected => {
                return Err(EngineError::InvalidPosition { expected, got });
            }
            _ => expected,
        };

        let gap = if request.is_default_source() {
            self.gaps.detect(&self.ledger)
        } else {
            None
        };

        let mut total = request.total_expected.max(position.value());
        if request.needs_more_thoughts {
            total = position.value() + MIN_EXPANSION.max(total.div_ceil(2));
        }

        let revises = request
            .revises
            .map(|reference| resolver.resolve(reference).map(|t| t.absolute_position))
            .transpose()?;

        let new_summary = sequence
            .is_none()
            .then(|| self.new_sequence_summary(request, origin.as_ref()));

        Ok(Plan {
            switch,
            sequence: sequence.map(|s| s.id.clone()),
            new_summary,
            position,
            total,
            expanded: request.needs_more_thoughts,
            revises,
            origin,
            gap,
        })
    }

    fn plan_switch(&self, target: &BranchId) -> Result<Switch, EngineError> {
        if target.is_main() {
            return Ok(Switch {
                sequence: self.sequences.main().map(|s| s.id.clone()),
                branch: None,
            });
        }
        match self.branches.get(target) {
            Some(branch) => Ok(Switch {
                sequence: Some(branch.current_sequence_id.clone()),
                branch: Some(branch.branch_id.clone()),
            }),
            None => Err(EngineError::UnknownBranch {
                id: target.clone(),
                available: self.branches.ids(),
            }),
        }
    }

    fn new_sequence_summary(&self, request: &ThoughtRequest, origin: Option<&Origin>) -> String {
        if let Some(origin) = origin {
            let label = request
                .branch_description
                .as_deref()
                .unwrap_or(origin.branch_id.as_str());
            return format!("Branch: {label}");
        }
        match request.sequence_description.as_deref() {
            Some(description) if request.start_new_sequence => description.to_string(),
            _ => format!("Sequence starting at {}", self.ledger.next_position()),
        }
    }

    fn commit(&mut self, request: ThoughtRequest, plan: Plan) -> ThoughtResponse {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        if let Some(switch) = plan.switch {
            if let Some(id) = &switch.sequence {
                self.sequences.set_current(id);
            }
            self.active_branch = switch.branch;
        }

        let absolute = self.ledger.next_position();
        let minted = plan.sequence.is_none();
        let sequence_id = match plan.sequence {
            Some(id) => id,
            None => {
                let id = self.sequences.mint(NewSequence {
                    summary: plan.new_summary.unwrap_or_default(),
                    created_at: created_at.clone(),
                    absolute_start: absolute,
                    inherited_context: plan
                        .origin
                        .as_ref()
                        .map(|o| o.context.clone())
                        .unwrap_or_default(),
                    parent_branch_id: plan.origin.as_ref().map(|o| o.branch_id.clone()),
                });
                tracing::info!(sequence = %id, start = %absolute, "new sequence");
                if request.start_new_sequence {
                    self.active_branch = None;
                }
                id
            }
        };

        let thought = Thought {
            content: request.content,
            sequence_position: plan.position,
            absolute_position: absolute,
            sequence_id: sequence_id.clone(),
            total_expected: plan.total,
            next_thought_needed: request.next_thought_needed,
            is_revision: request.is_revision,
            revises: plan.revises,
            branch: plan.origin.as_ref().map(|o| BranchOrigin {
                from: o.absolute,
                branch_id: o.branch_id.clone(),
                description: request.branch_description.clone(),
            }),
            source: request.source,
            needs_more_thoughts: request.needs_more_thoughts,
        };
        self.ledger.append(thought.clone());
        self.sequences.record_thought(&sequence_id);

        match plan.origin {
            Some(origin) => {
                tracing::info!(
                    branch = %origin.branch_id,
                    from = %origin.absolute,
                    sequence = %sequence_id,
                    "branch founded"
                );
                self.sequences
                    .add_child_branch(&origin.sequence_id, &origin.branch_id);
                self.branches.insert(BranchMetadata {
                    branch_id: origin.branch_id.clone(),
                    from_sequence_id: origin.sequence_id,
                    from_absolute_thought: origin.absolute,
                    from_sequence_thought: origin.sequence_position,
                    current_sequence_id: sequence_id.clone(),
                    created_at,
                    description: request.branch_description,
                    thoughts_in_branch: 1,
                });
                self.active_branch = Some(origin.branch_id);
            }
            None => {
                if let Some(active) = &self.active_branch {
                    self.branches.record_thought(active);
                }
            }
        }

        if thought.is_default_source() {
            self.gaps.record(absolute);
        }

        tracing::debug!(
            absolute = %absolute,
            position = %thought.sequence_position,
            sequence = %sequence_id,
            "thought committed"
        );

        if self.options.log_thoughts {
            let label = request
                .sequence_description
                .as_deref()
                .unwrap_or(sequence_id.as_str());
            let ctx = RenderContext {
                branch: self.active_branch.as_ref().map(BranchId::as_str),
                new_sequence: minted.then_some(label),
            };
            tracing::info!(target: "cascade::thought", "\n{}", render_thought(&thought, &ctx));
        }

        let snapshot = Snapshot {
            ledger: &self.ledger,
            sequences: &self.sequences,
            branches: &self.branches,
            active_branch: self.active_branch.as_ref(),
        };
        compose(
            &snapshot,
            Committed {
                thought: &thought,
                mode: request.response_mode.unwrap_or(self.options.response_mode),
                recent_limit: request.recent_limit.unwrap_or(self.options.recent_limit),
                default_recent_limit: self.options.recent_limit,
                gap: plan.gap,
                expanded: plan.expanded,
                retrieve: request.retrieve.as_ref(),
            },
        )
    }

    /// Number of thoughts recorded so far; also the highest absolute position.
    #[must_use]
    pub fn thought_count(&self) -> u32 {
        self.ledger.len()
    }

    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    #[must_use]
    pub fn current_sequence(&self) -> Option<&SequenceMetadata> {
        self.sequences.current()
    }

    #[must_use]
    pub fn current_branch(&self) -> &str {
        self.active_branch
            .as_ref()
            .map_or(BranchId::MAIN, BranchId::as_str)
    }

    #[must_use]
    pub fn thought(&self, position: AbsolutePosition) -> Option<&Thought> {
        self.ledger.get(position)
    }

    #[must_use]
    pub fn branch(&self, id: &str) -> Option<&BranchMetadata> {
        self.branches.get(&BranchId::new(id))
    }

    /// The private engine serving `source`, if one has been created.
    #[must_use]
    pub fn isolated(&self, source: &str) -> Option<&Engine> {
        self.isolated.get(source)
    }

    /// Resolve an `A{n}` / `S{n}` reference against the current sequence.
    pub fn resolve_reference(&self, raw: &str) -> Result<&Thought, EngineError> {
        let reference: ThoughtRef = raw.parse()?;
        Resolver::new(&self.ledger, self.sequences.current()).resolve(reference)
    }
}
