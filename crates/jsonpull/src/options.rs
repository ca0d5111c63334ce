/// Configuration options for the [`Tokenizer`](crate::Tokenizer).
///
/// # Examples
///
/// ```rust
/// use jsonpull::{TokenKind, Tokenizer, TokenizerOptions};
///
/// let mut input = b"[1 2]".to_vec();
/// let mut tokenizer = Tokenizer::with_options(
///     &mut input,
///     TokenizerOptions {
///         strict_separators: true,
///         ..Default::default()
///     },
/// );
/// assert_eq!(tokenizer.next().kind(), TokenKind::Array);
/// assert_eq!(tokenizer.next().kind(), TokenKind::UInt);
/// assert_eq!(tokenizer.next().kind(), TokenKind::Error);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Whether commas between array elements and object members are
    /// enforced.
    ///
    /// By default separators are lenient: a comma before the first member is
    /// skipped (`[,1]`) and a missing comma between members is not reported
    /// (`[1 2]`). When `true`, both are faults. A trailing comma (`[1,]`) is
    /// a fault in either mode.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_separators: bool,

    /// Maximum number of nested open containers.
    ///
    /// Opening an array or object beyond this depth is a fault. The
    /// expectation stack holds one entry per open container, so this bounds
    /// its memory.
    ///
    /// # Default
    ///
    /// `None` (unbounded)
    pub max_depth: Option<usize>,

    /// Whether content after the top-level value is a fault.
    ///
    /// By default the tokenizer stops once the top-level value is complete
    /// and reports `Eof` spanning whatever follows it, so `1 x` yields
    /// `UInt` then `Eof` covering ` x`. When `true`, anything other than
    /// whitespace after the value faults with
    /// `"Unexpected trailing characters"` and `Eof` covers only trailing
    /// whitespace.
    ///
    /// # Default
    ///
    /// `false`
    pub reject_trailing: bool,

    /// Initial capacity of the expectation stack.
    ///
    /// Documents nested deeper than this reallocate the stack once per
    /// doubling.
    ///
    /// # Default
    ///
    /// `512`
    pub stack_capacity: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            strict_separators: false,
            max_depth: None,
            reject_trailing: false,
            stack_capacity: 512,
        }
    }
}
