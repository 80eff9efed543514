//! Dialect assembly.
//!
//! A [`Dialect`] is an immutable description of one markup language: its
//! blocks in priority order, which of them interrupt paragraphs, the
//! paragraph itself, the phrase-modifier and token syntaxes, the heading id
//! strategy and the options it was created with. It holds factories rather
//! than block instances, so every parse gets fresh block state and a dialect
//! can be shared between threads.

pub mod options;

pub use options::MarkupOptions;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::outline::IdGenerationStrategy;
use crate::parsing::ContentState;
use crate::parsing::blocks::{Block, LineJoin, ParagraphBlock};
use crate::parsing::inline::{PatternBasedSyntax, SyntaxBuilder};
use crate::validation::ValidationRule;

/// Creates a fresh block instance.
pub type BlockFactory = Arc<dyn Fn() -> Box<dyn Block> + Send + Sync>;

/// Runs over the whole markup before parsing starts, e.g. to collect
/// footnote numbers that inline references need to know about.
pub type StatePreparer = fn(&str, &mut ContentState);

/// Rewrites the markup before anything else sees it, e.g. to expand
/// templates. Locators then refer to the rewritten text.
pub type MarkupPreprocessor = for<'m> fn(&'m str, &MarkupOptions) -> Cow<'m, str>;

/// A registered block, in priority order.
#[derive(Clone)]
pub struct BlockEntry {
    name: &'static str,
    breaks_paragraph: bool,
    factory: BlockFactory,
}

impl BlockEntry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this block ends an open paragraph when it can start.
    pub fn breaks_paragraph(&self) -> bool {
        self.breaks_paragraph
    }

    pub fn instantiate(&self) -> Box<dyn Block> {
        (self.factory)()
    }
}

impl fmt::Debug for BlockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockEntry")
            .field("name", &self.name)
            .field("breaks_paragraph", &self.breaks_paragraph)
            .finish()
    }
}

pub struct Dialect {
    name: String,
    blocks: Vec<BlockEntry>,
    paragraph: BlockFactory,
    phrase_modifiers: PatternBasedSyntax,
    tokens: PatternBasedSyntax,
    options: MarkupOptions,
    id_strategy: Option<Arc<dyn IdGenerationStrategy>>,
    preparer: Option<StatePreparer>,
    preprocessor: Option<MarkupPreprocessor>,
    validation_rules: Vec<Arc<dyn ValidationRule>>,
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("blocks", &self.blocks)
            .field("phrase_modifiers", &self.phrase_modifiers)
            .field("tokens", &self.tokens)
            .field("options", &self.options)
            .field("id_strategy", &self.id_strategy)
            .field("validation_rules", &self.validation_rules)
            .finish_non_exhaustive()
    }
}

impl Dialect {
    pub fn builder(name: impl Into<String>) -> DialectBuilder {
        DialectBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[BlockEntry] {
        &self.blocks
    }

    pub fn new_paragraph(&self) -> Box<dyn Block> {
        (self.paragraph)()
    }

    pub fn phrase_modifiers(&self) -> &PatternBasedSyntax {
        &self.phrase_modifiers
    }

    pub fn tokens(&self) -> &PatternBasedSyntax {
        &self.tokens
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    pub fn id_strategy(&self) -> Option<&dyn IdGenerationStrategy> {
        self.id_strategy.as_deref()
    }

    pub fn preparer(&self) -> Option<StatePreparer> {
        self.preparer
    }

    /// The text the blocks are run over: `markup` after the dialect's
    /// preprocessor, if it has one.
    pub fn preprocess<'m>(&self, markup: &'m str) -> Cow<'m, str> {
        match self.preprocessor {
            Some(preprocess) => preprocess(markup, &self.options),
            None => Cow::Borrowed(markup),
        }
    }

    pub fn validation_rules(&self) -> impl Iterator<Item = &dyn ValidationRule> {
        self.validation_rules.iter().map(|rule| rule.as_ref())
    }
}

/// Collects the parts of a [`Dialect`] and validates them in [`build`].
///
/// [`build`]: DialectBuilder::build
pub struct DialectBuilder {
    name: String,
    blocks: Vec<BlockEntry>,
    paragraph: Option<BlockFactory>,
    phrase_modifiers: SyntaxBuilder,
    tokens: SyntaxBuilder,
    options: MarkupOptions,
    id_strategy: Option<Arc<dyn IdGenerationStrategy>>,
    preparer: Option<StatePreparer>,
    preprocessor: Option<MarkupPreprocessor>,
    validation_rules: Vec<Arc<dyn ValidationRule>>,
}

impl DialectBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            paragraph: None,
            phrase_modifiers: SyntaxBuilder::new(),
            tokens: SyntaxBuilder::new(),
            options: MarkupOptions::default(),
            id_strategy: None,
            preparer: None,
            preprocessor: None,
            validation_rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: MarkupOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a block that leaves open paragraphs alone.
    #[must_use]
    pub fn block<B, F>(self, name: &'static str, factory: F) -> Self
    where
        B: Block + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.register(name, false, factory)
    }

    /// Appends a block that closes an open paragraph when it can start.
    #[must_use]
    pub fn paragraph_breaking_block<B, F>(self, name: &'static str, factory: F) -> Self
    where
        B: Block + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.register(name, true, factory)
    }

    /// Replaces the default paragraph, which joins lines with line breaks.
    #[must_use]
    pub fn paragraph<B, F>(mut self, factory: F) -> Self
    where
        B: Block + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.paragraph = Some(Arc::new(move || Box::new(factory()) as Box<dyn Block>));
        self
    }

    #[must_use]
    pub fn phrase_modifiers(mut self, configure: impl FnOnce(&mut SyntaxBuilder)) -> Self {
        configure(&mut self.phrase_modifiers);
        self
    }

    #[must_use]
    pub fn tokens(mut self, configure: impl FnOnce(&mut SyntaxBuilder)) -> Self {
        configure(&mut self.tokens);
        self
    }

    #[must_use]
    pub fn id_strategy(mut self, strategy: impl IdGenerationStrategy + 'static) -> Self {
        self.id_strategy = Some(Arc::new(strategy));
        self
    }

    #[must_use]
    pub fn preparer(mut self, preparer: StatePreparer) -> Self {
        self.preparer = Some(preparer);
        self
    }

    #[must_use]
    pub fn preprocessor(mut self, preprocessor: MarkupPreprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    #[must_use]
    pub fn validation_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.validation_rules.push(Arc::new(rule));
        self
    }

    /// Compiles the inline syntaxes. Any miscounted or invalid pattern is
    /// reported here.
    pub fn build(self) -> Result<Dialect, ConfigurationError> {
        let phrase_modifiers = self.phrase_modifiers.build()?;
        let tokens = self.tokens.build()?;
        log::debug!(
            "dialect {}: {} blocks, {} phrase modifiers, {} tokens",
            self.name,
            self.blocks.len(),
            phrase_modifiers.len(),
            tokens.len()
        );
        Ok(Dialect {
            name: self.name,
            blocks: self.blocks,
            paragraph: self.paragraph.unwrap_or_else(default_paragraph),
            phrase_modifiers,
            tokens,
            options: self.options,
            id_strategy: self.id_strategy,
            preparer: self.preparer,
            preprocessor: self.preprocessor,
            validation_rules: self.validation_rules,
        })
    }

    fn register<B, F>(mut self, name: &'static str, breaks_paragraph: bool, factory: F) -> Self
    where
        B: Block + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.blocks.push(BlockEntry {
            name,
            breaks_paragraph,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn Block>),
        });
        self
    }
}

fn default_paragraph() -> BlockFactory {
    Arc::new(|| Box::new(ParagraphBlock::new(LineJoin::LineBreak)) as Box<dyn Block>)
}
