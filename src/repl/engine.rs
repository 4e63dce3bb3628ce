//! Line editor setup: history, completion menu on Tab, highlighting

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, DefaultHinter, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::debug;

use crate::config::{Config, HistoryConfig};
use crate::error::{AutosuggestError, Result};
use crate::suggest::Suggester;

use super::completer::GrammarCompleter;
use super::highlighter::GrammarHighlighter;
use super::prompt::GrammarPrompt;

const COMPLETION_MENU: &str = "completion_menu";

/// REPL engine for interactive completion
pub struct ReplEngine {
    /// Line editor for input
    editor: Reedline,

    /// Prompt showing the start rule
    prompt: GrammarPrompt,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `suggester` - Completion engine bound to the active grammar
    /// * `config` - Loaded configuration (history and display settings)
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(suggester: Suggester, config: &Config) -> Result<Self> {
        let start_rule = {
            let grammar = suggester.grammar();
            grammar.rule_name(grammar.start_rule()).to_string()
        };

        let highlighter = GrammarHighlighter::new(
            suggester.grammar_handle(),
            suggester.options().limits,
            config.display.color_output,
        );
        let completer = GrammarCompleter::new(suggester);

        let completion_menu = ColumnarMenu::default().with_name(COMPLETION_MENU);
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let editor = Reedline::create()
            .with_history(Self::history(&config.history)?)
            .with_completer(Box::new(completer))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
            .with_highlighter(Box::new(highlighter))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(Style::new().fg(Color::DarkGray)),
            ))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));

        Ok(Self {
            editor,
            prompt: GrammarPrompt::new(start_rule),
        })
    }

    fn history(config: &HistoryConfig) -> Result<Box<FileBackedHistory>> {
        let history = if config.persist {
            debug!("Using history file {}", config.file_path.display());
            FileBackedHistory::with_file(config.max_size, config.file_path.clone())?
        } else {
            FileBackedHistory::new(config.max_size)?
        };

        Ok(Box::new(history))
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line or None on EOF / interrupt
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt) {
            Ok(Signal::Success(line)) => Ok(Some(line)),
            // Ctrl-C, Ctrl-D
            Ok(_) => Ok(None),
            Err(err) => Err(AutosuggestError::Readline(err.to_string())),
        }
    }
}
