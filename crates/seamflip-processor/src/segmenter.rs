//! Stream segmentation into pass-through regions and perimeter blocks
//!
//! The segmenter is a four-state machine driven one line at a time:
//!
//! ```text
//! StartEnd ──; printing object──► OutsidePerimeters ──;TYPE:Perimeter──► InPerimeters
//!    ▲                                 │      ▲                              │
//!    └──────; stop printing object─────┘      └────────;TYPE:<other>─────────┤
//!    └──────────────────────────; stop printing object───────────────────────┘
//! ```
//!
//! Outside perimeter blocks every line is copied verbatim. Inside an object the
//! running [`Movement`] is kept up to date so that a block's entry state is exact;
//! with [`ProcessingOptions::track_outside_objects`] lines between objects are folded too.
//! Lines inside a block are held back; when the block closes they are replaced by
//! the reversed traversal and the closing marker is copied after it.

use seamflip_core::markers::BlockMarker;
use seamflip_core::movement::{update_movement, Movement};
use seamflip_core::policy::{ProcessingOptions, UnterminatedBlockPolicy};

use crate::reverser::reverse_block;

/// Blocks with fewer captured moves than this are copied unchanged
const MIN_MOVES_TO_REVERSE: usize = 2;

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Outside any object; lines are copied
    StartEnd,
    /// Inside an object, outside perimeter blocks
    OutsidePerimeters,
    /// Inside a perimeter block
    InPerimeters,
    /// Input exhausted
    Exit,
}

impl std::fmt::Display for SegmenterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartEnd => write!(f, "start/end"),
            Self::OutsidePerimeters => write!(f, "outside perimeters"),
            Self::InPerimeters => write!(f, "in perimeters"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Counters collected while processing a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReversalStats {
    /// Lines fed into the segmenter
    pub lines_read: usize,
    /// Lines in the produced output
    pub lines_written: usize,
    /// Perimeter blocks replaced by a reversed traversal
    pub blocks_reversed: usize,
    /// Perimeter blocks copied unchanged because they had too few moves
    pub blocks_unchanged: usize,
    /// Motion lines re-synthesized in reverse
    pub moves_reversed: usize,
    /// Whether the input ended inside a perimeter block
    pub unterminated_block: bool,
}

/// Result of a full segmenter run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReversalOutput {
    pub lines: Vec<String>,
    /// For each entry of `lines`, the zero-based input line it was copied from;
    /// `None` for synthesized lines
    pub sources: Vec<Option<usize>>,
    pub stats: ReversalStats,
}

/// A perimeter block being captured
#[derive(Debug, Default)]
struct OpenBlock {
    /// Entry state followed by one snapshot per motion line
    trace: Vec<Movement>,
    /// Original lines with their input index, kept for blocks that are not reversed
    raw: Vec<(usize, String)>,
}

impl OpenBlock {
    fn starting_at(entry: Movement) -> Self {
        Self {
            trace: vec![entry],
            raw: Vec::new(),
        }
    }

    fn moves(&self) -> usize {
        self.trace.len() - 1
    }
}

/// Incremental perimeter reversal over a line stream
#[derive(Debug)]
pub struct PerimeterSegmenter {
    state: SegmenterState,
    movement: Movement,
    block: Option<OpenBlock>,
    output: Vec<String>,
    sources: Vec<Option<usize>>,
    stats: ReversalStats,
    options: ProcessingOptions,
}

impl Default for PerimeterSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PerimeterSegmenter {
    /// Create a segmenter with default options
    pub fn new() -> Self {
        Self::with_options(ProcessingOptions::default())
    }

    pub fn with_options(options: ProcessingOptions) -> Self {
        Self {
            state: SegmenterState::StartEnd,
            movement: Movement::new(),
            block: None,
            output: Vec::new(),
            sources: Vec::new(),
            stats: ReversalStats::default(),
            options,
        }
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Last known machine state
    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    /// Feed one input line (without its line terminator)
    pub fn feed(&mut self, line: &str) {
        if self.state == SegmenterState::Exit {
            tracing::debug!("ignoring line fed after end of input: {}", line);
            return;
        }
        let index = self.stats.lines_read;
        self.stats.lines_read += 1;

        match self.state {
            SegmenterState::StartEnd => {
                self.copy_input(index, line);
                if self.options.track_outside_objects {
                    update_movement(line, &mut self.movement);
                }
                if BlockMarker::classify(line) == Some(BlockMarker::ObjectStart) {
                    self.transition(SegmenterState::OutsidePerimeters);
                }
            }
            SegmenterState::OutsidePerimeters => {
                self.copy_input(index, line);
                update_movement(line, &mut self.movement);
                match BlockMarker::classify(line) {
                    Some(BlockMarker::ObjectEnd) => self.transition(SegmenterState::StartEnd),
                    Some(BlockMarker::PerimeterStart) => {
                        self.block = Some(OpenBlock::starting_at(self.movement));
                        self.transition(SegmenterState::InPerimeters);
                    }
                    _ => {}
                }
            }
            SegmenterState::InPerimeters => self.feed_block_line(index, line),
            SegmenterState::Exit => {}
        }
    }

    fn feed_block_line(&mut self, index: usize, line: &str) {
        let moved = update_movement(line, &mut self.movement);
        let marker = BlockMarker::classify(line).filter(|m| m.closes_perimeter_block());

        let block = self.block.get_or_insert_with(|| OpenBlock::starting_at(self.movement));
        if moved {
            block.trace.push(self.movement);
        }

        let Some(marker) = marker else {
            block.raw.push((index, line.to_string()));
            return;
        };

        self.close_block();
        self.copy_input(index, line);
        if marker == BlockMarker::ObjectEnd {
            self.transition(SegmenterState::StartEnd);
        } else {
            self.transition(SegmenterState::OutsidePerimeters);
        }
    }

    /// Replace the open block with its reversal, or copy it if too short
    fn close_block(&mut self) {
        let Some(mut block) = self.block.take() else {
            return;
        };
        self.movement = self.movement.idle();

        let moves = block.moves();
        // deliberately copied unchanged rather than reversed
        if moves < MIN_MOVES_TO_REVERSE {
            tracing::debug!(moves, "perimeter block too short to reverse, copying");
            self.stats.blocks_unchanged += 1;
            self.copy_block(&mut block);
            return;
        }

        block.trace.push(self.movement);
        let reversed = reverse_block(&block.trace);
        tracing::debug!(
            moves,
            original_lines = block.raw.len(),
            reversed_lines = reversed.len(),
            "reversed perimeter block"
        );
        self.stats.blocks_reversed += 1;
        self.stats.moves_reversed += moves;
        self.sources.resize(self.output.len() + reversed.len(), None);
        self.output.extend(reversed);
    }

    fn copy_input(&mut self, index: usize, line: &str) {
        self.output.push(line.to_string());
        self.sources.push(Some(index));
    }

    fn copy_block(&mut self, block: &mut OpenBlock) {
        for (index, line) in block.raw.drain(..) {
            self.output.push(line);
            self.sources.push(Some(index));
        }
    }

    fn transition(&mut self, next: SegmenterState) {
        tracing::trace!(from = %self.state, to = %next, "segmenter transition");
        self.state = next;
    }

    /// Signal end of input and take the produced lines.
    ///
    /// A block still open at this point is handled per the configured
    /// [`UnterminatedBlockPolicy`]. The segmenter is left in [`SegmenterState::Exit`].
    pub fn finish(&mut self) -> ReversalOutput {
        if self.state == SegmenterState::InPerimeters {
            self.stats.unterminated_block = true;
            self.finish_unterminated_block();
        }
        self.transition(SegmenterState::Exit);

        let lines = std::mem::take(&mut self.output);
        let sources = std::mem::take(&mut self.sources);
        self.stats.lines_written = lines.len();
        ReversalOutput {
            lines,
            sources,
            stats: self.stats,
        }
    }

    fn finish_unterminated_block(&mut self) {
        match self.options.unterminated_block {
            UnterminatedBlockPolicy::PassThrough => {
                if let Some(mut block) = self.block.take() {
                    tracing::warn!(
                        lines = block.raw.len(),
                        "input ended inside a perimeter block; copying it unchanged"
                    );
                    self.stats.blocks_unchanged += 1;
                    self.copy_block(&mut block);
                }
            }
            UnterminatedBlockPolicy::Drop => {
                if let Some(block) = self.block.take() {
                    tracing::warn!(
                        lines = block.raw.len(),
                        "input ended inside a perimeter block; dropping it"
                    );
                }
            }
            UnterminatedBlockPolicy::Reverse => {
                tracing::warn!("input ended inside a perimeter block; reversing it anyway");
                self.close_block();
            }
        }
    }
}

/// Run a whole stream through a segmenter configured with `options`
pub fn process_lines<I, S>(lines: I, options: ProcessingOptions) -> ReversalOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = PerimeterSegmenter::with_options(options);
    for line in lines {
        segmenter.feed(line.as_ref());
    }
    segmenter.finish()
}

/// Reverse every perimeter block in `lines` using default options
pub fn reverse_perimeters<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    process_lines(lines, ProcessingOptions::default()).lines
}
