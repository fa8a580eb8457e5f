use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tubeqa_core::{update, AppState, Msg};
use tubeqa_gateway::EventSink;
use tubeqa_logging::{tubeqa_debug, tubeqa_info};

use super::config::{AppConfig, Cli};
use super::effects::{AppEventSink, EffectExecutor, EffectRunner};
use super::logging;
use super::ui::commands::{
    blocked_question_notice, is_confirmation, parse_command, resolve, Action,
};
use super::ui::render::TerminalRenderer;

/// Everything the application loop reacts to.
#[derive(Debug)]
pub enum AppInput {
    /// One line typed by the user.
    Line(String),
    /// Standard input reached end of file.
    InputClosed,
    /// A core message produced by a gateway completion.
    Msg(Msg),
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli).context("loading configuration")?;
    logging::initialize(config.log_destination, config.verbose);
    tubeqa_info!("Starting tubeqa against {}", config.api_base_url);

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let alive = Arc::new(AtomicBool::new(true));
    let sink: Arc<dyn EventSink> = Arc::new(AppEventSink::new(input_tx.clone(), alive.clone()));
    let runner =
        EffectRunner::new(config.gateway_settings(), sink).context("starting the gateway")?;
    let poller = runner.start_health_polling(config.health_interval);

    spawn_stdin_reader(input_tx);

    let mut app = App::new(runner, io::stdout());
    app.start()?;
    while let Ok(input) = input_rx.recv() {
        app.handle_input(input)?;
        if app.should_quit() {
            break;
        }
    }

    // Teardown: nothing may touch state after this point.
    alive.store(false, Ordering::Release);
    poller.stop();
    tubeqa_info!("tubeqa stopped");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppInput::InputClosed);
    });
}

/// Single owner of the core state. Every change goes through `update`.
pub struct App<E, W> {
    state: AppState,
    renderer: TerminalRenderer,
    executor: E,
    out: W,
    confirming_clear: bool,
    quit: bool,
}

impl<E: EffectExecutor, W: Write> App<E, W> {
    pub fn new(executor: E, out: W) -> Self {
        Self {
            state: AppState::new(),
            renderer: TerminalRenderer::new(),
            executor,
            out,
            confirming_clear: false,
            quit: false,
        }
    }

    pub fn start(&mut self) -> io::Result<()> {
        self.print(&[
            "TubeQA: ask anything about any YouTube video.".to_string(),
            "Type /help for commands.".to_string(),
        ])?;
        self.render()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_input(&mut self, input: AppInput) -> io::Result<()> {
        match input {
            AppInput::Line(line) => self.handle_line(&line),
            AppInput::InputClosed => {
                self.quit = true;
                Ok(())
            }
            AppInput::Msg(msg) => self.dispatch_msg(msg),
        }
    }

    fn handle_line(&mut self, line: &str) -> io::Result<()> {
        if std::mem::take(&mut self.confirming_clear) {
            if is_confirmation(line) {
                return self.dispatch_msg(Msg::ClearAllClicked);
            }
            return self.print(&["Clear cancelled.".to_string()]);
        }

        let view = self.state.view();
        let command = parse_command(line);
        let notice = blocked_question_notice(&command, &view);
        match resolve(command, &view, Utc::now()) {
            Action::Dispatch(msgs) => {
                for msg in msgs {
                    self.dispatch_msg(msg)?;
                }
                match notice {
                    Some(notice) => self.print(&[notice.to_string()]),
                    None => Ok(()),
                }
            }
            Action::Print(lines) => self.print(&lines),
            Action::ConfirmClear => {
                self.confirming_clear = true;
                self.print(&[
                    "Delete ALL stored video chunks? This cannot be undone. [y/N]".to_string(),
                ])
            }
            Action::Quit => {
                self.quit = true;
                Ok(())
            }
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if !effects.is_empty() {
            tubeqa_debug!("Executing {} effect(s)", effects.len());
            self.executor.execute(effects);
        }
        if self.state.consume_dirty() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        let lines = self.renderer.render(&view);
        self.print(&lines)
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
