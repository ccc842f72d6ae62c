//! CLI (Command Line Interface) mode
//!
//! Interactive REPL that stands in for a real chat surface. Lines starting
//! with `/` control the REPL; everything else is delivered to the bot as if
//! the current sender had written it in the current chat.

use nu_ansi_term::{Color, Style};
use promzy_core::{Dispatcher, OutgoingMessage};
use promzy_pair::{IncomingMessage, PairBot};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use std::borrow::Cow;
use tracing::info;

/// REPL control commands
const REPL_COMMANDS: &[(&str, &str)] = &[
    ("/as", "Switch the simulated sender"),
    ("/chat", "Switch the current chat"),
    ("/history", "Show replies sent to this chat (add 'json' for JSON)"),
    ("/help", "Show this help"),
    ("/exit", "Quit"),
];

/// Chat bot commands, for completion
const BOT_COMMANDS: &[(&str, &str)] = &[
    (".menu", "Show the command menu"),
    (".alive", "Liveness check"),
    (".tagall", "Mention every member"),
    (".status", "Show, set or auto-toggle status"),
    (".tictactoe", "start | join | move <1-9>"),
];

/// Pair bot commands, for completion
const PAIR_COMMANDS: &[(&str, &str)] = &[
    ("!pair", "Request a pair code"),
    ("!help", "List commands"),
    ("!status", "Bot status"),
];

/// A parsed REPL control line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Exit,
    Help,
    History { json: bool },
    As(String),
    Chat(String),
    /// Known command missing its argument
    Usage(&'static str),
    Unknown(String),
}

/// Parse a REPL control line. Returns `None` for bot input.
pub fn parse_cli_command(input: &str) -> Option<CliCommand> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    let command = match (cmd.as_str(), arg) {
        ("/exit" | "/quit" | "/q", _) => CliCommand::Exit,
        ("/help" | "/?", _) => CliCommand::Help,
        ("/history", arg) => CliCommand::History {
            json: arg.is_some_and(|a| a.eq_ignore_ascii_case("json")),
        },
        ("/as", Some(sender)) => CliCommand::As(sender.to_string()),
        ("/as", None) => CliCommand::Usage("/as <sender>"),
        ("/chat", Some(chat)) => CliCommand::Chat(chat.to_string()),
        ("/chat", None) => CliCommand::Usage("/chat <id>"),
        _ => CliCommand::Unknown(input.to_string()),
    };
    Some(command)
}

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new(bot_commands: &[(&'static str, &'static str)]) -> Self {
        let mut commands = REPL_COMMANDS.to_vec();
        commands.extend_from_slice(bot_commands);
        Self { commands }
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if line.is_empty() || line.contains(char::is_whitespace) {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt showing the simulated sender and chat
struct ColoredPrompt {
    label: String,
    style: Style,
}

impl ColoredPrompt {
    fn new(label: String) -> Self {
        Self {
            label,
            style: Color::Cyan.bold(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.style.paint(format!("{}> ", self.label)).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// Build the line editor used by both modes
fn line_editor(bot_commands: &[(&'static str, &'static str)]) -> Reedline {
    let mut keybindings = default_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![
            reedline::EditCommand::InsertChar('/'),
            reedline::EditCommand::Complete,
        ]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(48))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    Reedline::create()
        .with_completer(Box::new(CommandCompleter::new(bot_commands)))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

/// Read one line. `None` means the session is over.
fn read_input(editor: &mut Reedline, label: String) -> Option<String> {
    let prompt = ColoredPrompt::new(label);
    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => return Some(line),
            Ok(Signal::CtrlC) => {
                println!("^C");
            }
            Ok(Signal::CtrlD) => {
                println!("\n👋 Bye!\n");
                return None;
            }
            Err(err) => {
                eprintln!("\n❌ Error: {}\n", err);
                return None;
            }
        }
    }
}

/// Run the simulated chat bot REPL
pub fn run_chat(dispatcher: Dispatcher) -> anyhow::Result<()> {
    let mut sender = "alice".to_string();
    let mut chat = "group-1".to_string();
    let mut editor = line_editor(BOT_COMMANDS);

    info!("Starting chat CLI");
    print_welcome("chat bot", "Try .menu, or /as bob to switch sender");

    while let Some(line) = read_input(&mut editor, format!("{}@{}", sender, chat)) {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match parse_cli_command(input) {
            None => print_reply(&dispatcher.handle(&sender, &chat, input)),
            Some(CliCommand::Exit) => break,
            Some(CliCommand::Help) => print_help(BOT_COMMANDS),
            Some(CliCommand::History { json }) => {
                print_history(&chat, &dispatcher.store().messages(&chat), json)?
            }
            Some(CliCommand::As(name)) => {
                sender = name;
                println!("\n✅ Now sending as {}\n", sender);
            }
            Some(CliCommand::Chat(id)) => {
                chat = id;
                println!("\n✅ Switched to chat {}\n", chat);
            }
            Some(CliCommand::Usage(usage)) => eprintln!("\n❓ Usage: {}\n", usage),
            Some(CliCommand::Unknown(cmd)) => eprintln!(
                "\n❓ Unknown command: {}. Use /help to list commands.\n",
                cmd
            ),
        }
    }

    Ok(())
}

/// Run the pair-code bot REPL
pub async fn run_pair(bot: PairBot) -> anyhow::Result<()> {
    let mut sender = "15550001@c.us".to_string();
    let mut editor = line_editor(PAIR_COMMANDS);

    info!("Starting pair CLI");
    print_welcome(
        "pair bot",
        "Send !pair to get a code, or paste a JSON message event",
    );

    while let Some(line) = read_input(&mut editor, sender.clone()) {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match parse_cli_command(input) {
            None => match pair_event(&sender, input) {
                Ok(msg) => match bot.handle(&msg).await {
                    Some(reply) => println!("\n{}\n", reply),
                    None => println!("\n(no reply)\n"),
                },
                Err(e) => eprintln!("\n❌ Invalid event: {}\n", e),
            },
            Some(CliCommand::Exit) => break,
            Some(CliCommand::Help) => print_help(PAIR_COMMANDS),
            Some(CliCommand::As(name)) => {
                sender = name;
                println!("\n✅ Now sending as {}\n", sender);
            }
            Some(CliCommand::History { .. } | CliCommand::Chat(_)) => {
                eprintln!("\n❓ Not available in pair mode.\n")
            }
            Some(CliCommand::Usage(usage)) => eprintln!("\n❓ Usage: {}\n", usage),
            Some(CliCommand::Unknown(cmd)) => eprintln!(
                "\n❓ Unknown command: {}. Use /help to list commands.\n",
                cmd
            ),
        }
    }

    Ok(())
}

/// Build the event for a pair-mode line. A line starting with `{` is a raw
/// JSON event; anything else is a direct message from `sender`.
fn pair_event(sender: &str, input: &str) -> promzy_pair::Result<IncomingMessage> {
    if input.starts_with('{') {
        IncomingMessage::from_json(input)
    } else {
        Ok(IncomingMessage::direct(sender, input))
    }
}

fn print_reply(message: &OutgoingMessage) {
    println!("\n{}\n", message.text);
}

/// Print welcome message
fn print_welcome(mode: &str, hint: &str) {
    println!();
    println!("🤖 promzy CLI ({})", mode);
    println!("   {}", hint);
    println!("   /help lists REPL commands, Ctrl+D quits");
    println!();
}

/// Print help message
fn print_help(bot_commands: &[(&str, &str)]) {
    println!();
    println!("📖 REPL commands:");
    for (cmd, desc) in REPL_COMMANDS {
        println!("  {} - {}", cmd, desc);
    }
    println!();
    println!("📖 Bot commands:");
    for (cmd, desc) in bot_commands {
        println!("  {} - {}", cmd, desc);
    }
    println!();
}

/// Print the reply log of a chat
fn print_history(chat: &str, messages: &[OutgoingMessage], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    println!();
    println!("📜 Replies in {} ({}):", chat, messages.len());
    println!("{}", "─".repeat(50));
    for (i, msg) in messages.iter().enumerate() {
        let text = msg.text.replace('\n', " ⏎ ");
        let preview: String = text.chars().take(100).collect();
        println!("{}. [{}] {}", i + 1, msg.time.format("%H:%M:%S"), preview);
    }
    println!("{}", "─".repeat(50));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_input_is_not_a_cli_command() {
        assert_eq!(parse_cli_command(".menu"), None);
        assert_eq!(parse_cli_command("hello"), None);
        assert_eq!(parse_cli_command("!pair"), None);
    }

    #[test]
    fn test_parse_cli_commands() {
        assert_eq!(parse_cli_command("/exit"), Some(CliCommand::Exit));
        assert_eq!(parse_cli_command("/Q"), Some(CliCommand::Exit));
        assert_eq!(parse_cli_command("/help"), Some(CliCommand::Help));
        assert_eq!(
            parse_cli_command("/history"),
            Some(CliCommand::History { json: false })
        );
        assert_eq!(
            parse_cli_command("/history JSON"),
            Some(CliCommand::History { json: true })
        );
        assert_eq!(
            parse_cli_command("/as Bob"),
            Some(CliCommand::As("Bob".to_string()))
        );
        assert_eq!(
            parse_cli_command(" /chat group-2 "),
            Some(CliCommand::Chat("group-2".to_string()))
        );
    }

    #[test]
    fn test_parse_cli_missing_argument() {
        assert_eq!(parse_cli_command("/as"), Some(CliCommand::Usage("/as <sender>")));
        assert_eq!(parse_cli_command("/chat"), Some(CliCommand::Usage("/chat <id>")));
    }

    #[test]
    fn test_pair_event_plain_text_is_direct_message() {
        let msg = pair_event("15550001@c.us", "!pair").unwrap();
        assert_eq!(msg.from, "15550001@c.us");
        assert_eq!(msg.body, "!pair");
        assert!(!msg.is_group);
    }

    #[test]
    fn test_pair_event_json() {
        let msg = pair_event(
            "15550001@c.us",
            r#"{"from":"group@g.us","body":"!pair","isGroupMsg":true}"#,
        )
        .unwrap();
        assert_eq!(msg.from, "group@g.us");
        assert!(msg.is_group);

        assert!(pair_event("15550001@c.us", r#"{"from":"x"}"#).is_err());
    }

    #[test]
    fn test_parse_cli_unknown() {
        assert_eq!(
            parse_cli_command("/dance now"),
            Some(CliCommand::Unknown("/dance now".to_string()))
        );
    }

    #[test]
    fn test_completer_suggests_bot_and_repl_commands() {
        let mut completer = CommandCompleter::new(BOT_COMMANDS);

        let values: Vec<String> = completer.complete(".t", 2).into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec![".tagall".to_string(), ".tictactoe".to_string()]);

        let values: Vec<String> = completer.complete("/h", 2).into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec!["/history".to_string(), "/help".to_string()]);

        assert!(completer.complete(".tictactoe mo", 13).is_empty());
    }
}
