use std::collections::HashMap;
use std::fs;
use std::str::SplitWhitespace;

use anyhow::{Context as _, Result, bail};
use prefpop_core::{FetchRequest, Session};

use super::{
    print_catalog, print_chart, print_help, print_selection, print_status, resolve_pref_code,
};

/// What the prompt loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Context<'a> {
    session: &'a mut Session,
    pending: Vec<FetchRequest>,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            pending: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }

    pub fn toggle(&mut self, token: &str, checked: bool) -> Result<()> {
        let pref_code = resolve_pref_code(self.session(), token)?;
        if let Some(request) = self.session.toggle(pref_code, checked) {
            self.pending.push(request);
        }
        Ok(())
    }

    /// Requests issued by the command, to be sent once it returns.
    pub fn into_pending(self) -> Vec<FetchRequest> {
        self.pending
    }
}

/// Whitespace separated arguments following the command name.
pub struct Args<'a>(SplitWhitespace<'a>);

impl<'a> Args<'a> {
    pub fn optional(&mut self) -> Option<&'a str> {
        self.0.next()
    }

    /// Prefecture tokens; at least one is required.
    pub fn prefectures(self, missing: &str) -> Result<Vec<&'a str>> {
        let tokens: Vec<&'a str> = self.0.collect();
        if tokens.is_empty() {
            bail!("{missing}");
        }
        Ok(tokens)
    }
}

pub trait Command {
    /// The command name followed by its aliases.
    const NAMES: &'static [&'static str];

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<Flow>;
}

type Handler = for<'a> fn(&mut Context<'a>, Args<'a>) -> Result<Flow>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, Handler>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        for &name in C::NAMES {
            if self.handlers.insert(name, C::execute).is_some() {
                panic!("重複したコマンド登録です: {name}");
            }
        }
    }

    pub fn execute_input<'a>(&self, ctx: &mut Context<'a>, input: &'a str) -> Result<Flow> {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            bail!("コマンドが指定されていません。");
        };
        let name = head.to_ascii_lowercase();
        match self.handlers.get(name.as_str()) {
            Some(handler) => handler(ctx, Args(words)),
            None => bail!("未対応のコマンドです: {head}. help で一覧を確認してください。"),
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register::<HelpCommand>();
        registry.register::<ListCommand>();
        registry.register::<CheckCommand>();
        registry.register::<UncheckCommand>();
        registry.register::<SelectedCommand>();
        registry.register::<StatusCommand>();
        registry.register::<ChartCommand>();
        registry.register::<ExportCommand>();
        registry.register::<QuitCommand>();
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    const NAMES: &'static [&'static str] = &["help", "?"];

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        print_help();
        Ok(Flow::Continue)
    }
}

pub struct ListCommand;

impl Command for ListCommand {
    const NAMES: &'static [&'static str] = &["list", "ls"];

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        print_catalog(ctx.session());
        Ok(Flow::Continue)
    }
}

pub struct CheckCommand;

impl Command for CheckCommand {
    const NAMES: &'static [&'static str] = &["check"];

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<Flow> {
        for token in args.prefectures("選択する都道府県を指定してください。")? {
            ctx.toggle(token, true)?;
        }
        Ok(Flow::Continue)
    }
}

pub struct UncheckCommand;

impl Command for UncheckCommand {
    const NAMES: &'static [&'static str] = &["uncheck"];

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<Flow> {
        for token in args.prefectures("選択を解除する都道府県を指定してください。")? {
            ctx.toggle(token, false)?;
        }
        Ok(Flow::Continue)
    }
}

pub struct SelectedCommand;

impl Command for SelectedCommand {
    const NAMES: &'static [&'static str] = &["selected"];

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        print_selection(ctx.session());
        Ok(Flow::Continue)
    }
}

pub struct StatusCommand;

impl Command for StatusCommand {
    const NAMES: &'static [&'static str] = &["status"];

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        print_status(ctx.session());
        Ok(Flow::Continue)
    }
}

pub struct ChartCommand;

impl Command for ChartCommand {
    const NAMES: &'static [&'static str] = &["chart"];

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        print_chart(&ctx.session().chart());
        Ok(Flow::Continue)
    }
}

pub struct ExportCommand;

impl Command for ExportCommand {
    const NAMES: &'static [&'static str] = &["export"];

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<Flow> {
        let json = serde_json::to_string_pretty(&ctx.session().chart())
            .context("グラフデータの JSON 変換に失敗しました")?;
        match args.optional() {
            Some(path) => {
                fs::write(path, json)
                    .with_context(|| format!("ファイルへの書き込みに失敗しました: {path}"))?;
                println!("グラフデータを {path} に書き出しました。");
            }
            None => println!("{json}"),
        }
        Ok(Flow::Continue)
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    const NAMES: &'static [&'static str] = &["quit", "exit"];

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<Flow> {
        println!("終了します。");
        Ok(Flow::Quit)
    }
}
