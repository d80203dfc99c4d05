//! App state and main loop: input handling, route changes, subscription lifecycle and drawing.

use std::{io, sync::Arc, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    Terminal,
};
use tokio::{task::JoinHandle, time::sleep};
use tracing::{info, warn};

use crate::dashboard::{self, DashboardData, SharedData, REALTIME_STATS};
use crate::error::AuthError;
use crate::gateway::Gateway;
use crate::guard::{Navigator, Route, Router};
use crate::login::login;
use crate::poller::Scheduler;
use crate::session::Credentials;
use crate::ui::{
    header::draw_header,
    login::{draw_login, login_handle_key, LoginAction, LoginForm},
    series::draw_series_chart,
    totals::draw_total_spark,
    usage::{draw_collapsed, draw_usage_panel},
};

const FRAME_DELAY: Duration = Duration::from_millis(50);

pub struct App {
    router: Arc<Router>,
    gateway: Arc<Gateway>,

    // Subscriptions of the mounted view
    scheduler: Scheduler,
    data: SharedData,
    mounted: Option<Route>,

    form: LoginForm,
    pending_login: Option<JoinHandle<Result<Credentials, AuthError>>>,

    // Real-time panel starts collapsed; its subscription follows it
    realtime_open: bool,

    should_quit: bool,
}

impl App {
    pub fn new(router: Arc<Router>, gateway: Arc<Gateway>) -> Self {
        Self {
            router,
            gateway,
            scheduler: Scheduler::new(),
            data: SharedData::default(),
            mounted: None,
            form: LoginForm::default(),
            pending_login: None,
            realtime_open: false,
            should_quit: false,
        }
    }

    /// Pre-fill the login form's username.
    pub fn with_username(mut self, username: Option<String>) -> Self {
        if let Some(u) = username {
            self.form = LoginForm::with_username(u);
        }
        self
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn data(&self) -> &SharedData {
        &self.data
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn realtime_open(&self) -> bool {
        self.realtime_open
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        self.scheduler.clear();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            self.step().await;
            terminal.draw(|f| self.draw(f))?;

            sleep(FRAME_DELAY).await;
        }
        Ok(())
    }

    /// Settle a finished login and follow route changes.
    pub async fn step(&mut self) {
        self.poll_login().await;
        self.sync_route();
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        match self.router.current() {
            Route::Login => match login_handle_key(&mut self.form, k) {
                LoginAction::Submit => self.submit_login(),
                LoginAction::Quit => self.should_quit = true,
                LoginAction::None => {}
            },
            Route::Dashboard => match k.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_realtime(),
                KeyCode::Char('l') | KeyCode::Char('L') => self.logout(),
                _ => {}
            },
        }
    }

    fn submit_login(&mut self) {
        if self.pending_login.is_some() {
            return;
        }
        self.form.busy = true;
        self.form.error = None;
        let gw = self.gateway.clone();
        let user = self.form.username.clone();
        let pass = self.form.password.clone();
        self.pending_login = Some(tokio::spawn(async move { login(&gw, &user, &pass).await }));
    }

    async fn poll_login(&mut self) {
        if !self.pending_login.as_ref().is_some_and(|h| h.is_finished()) {
            return;
        }
        let Some(handle) = self.pending_login.take() else {
            return;
        };
        self.form.busy = false;
        match handle.await {
            Ok(Ok(_)) => {
                self.form.password.clear();
                self.router.navigate(Route::Dashboard);
            }
            Ok(Err(e)) => self.form.error = Some(e.to_string()),
            Err(e) => {
                warn!(error = %e, "login task failed");
                self.form.error = Some(AuthError::InvalidCredentials.to_string());
            }
        }
    }

    fn toggle_realtime(&mut self) {
        self.realtime_open = !self.realtime_open;
        self.scheduler.set_active(REALTIME_STATS, self.realtime_open);
    }

    fn logout(&mut self) {
        info!("logout requested");
        self.gateway.session().clear();
        self.router.redirect_to_login();
        self.sync_route();
    }

    /// Mount or unmount the dashboard's subscriptions when the route changed.
    pub fn sync_route(&mut self) {
        let route = self.router.current();
        if self.mounted == Some(route) {
            return;
        }
        match route {
            Route::Dashboard => {
                for sub in dashboard::subscriptions(&self.gateway, &self.data) {
                    let id = sub.id();
                    self.scheduler.insert(sub);
                    if id != REALTIME_STATS || self.realtime_open {
                        self.scheduler.start(id);
                    }
                }
            }
            Route::Login => {
                self.scheduler.clear();
                self.realtime_open = false;
                self.form.password.clear();
                *dashboard::lock(&self.data) = DashboardData::default();
            }
        }
        self.mounted = Some(route);
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        match self.router.current() {
            Route::Login => draw_login(f, area, &self.form),
            Route::Dashboard => self.draw_dashboard(f),
        }
    }

    fn draw_dashboard(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let d = dashboard::lock(&self.data);

        let realtime_rows = if self.realtime_open {
            Constraint::Ratio(1, 4)
        } else {
            Constraint::Length(3)
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Length(5),   // totals sparklines
                Constraint::Ratio(1, 4), // basic cpu/mem
                realtime_rows,
                Constraint::Min(8),      // last hour charts
            ])
            .split(area);

        draw_header(
            f,
            rows[0],
            self.gateway.base().as_str(),
            self.gateway.session().remaining_ms(),
        );

        let halves = |r: Rect| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(r)
        };

        let spark = halves(rows[1]);
        draw_total_spark(
            f,
            spark[0],
            "CPU",
            &d.history.cpu,
            d.basic_cpu.as_ref().map(|s| s.total_usage),
            Color::Cyan,
        );
        draw_total_spark(
            f,
            spark[1],
            "Memory",
            &d.history.mem,
            d.basic_mem.as_ref().map(|s| s.total_usage),
            Color::Magenta,
        );

        let basic = halves(rows[2]);
        draw_usage_panel(f, basic[0], "CPU usage", d.basic_cpu.as_ref());
        draw_usage_panel(f, basic[1], "Memory usage", d.basic_mem.as_ref());

        if self.realtime_open {
            let rt = halves(rows[3]);
            draw_usage_panel(f, rt[0], "Real-time CPU", d.realtime_cpu.as_ref());
            draw_usage_panel(f, rt[1], "Real-time memory", d.realtime_mem.as_ref());
        } else {
            draw_collapsed(f, rows[3]);
        }

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[4]);
        let stacked = |r: Rect| {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(r)
        };

        draw_series_chart(f, charts[0], "Last hour: totals (%)", &d.totals, Some(100.0));
        let procs = stacked(charts[1]);
        draw_series_chart(f, procs[0], "Processes CPU", &d.process_cpu, None);
        draw_series_chart(f, procs[1], "Processes memory", &d.process_mem, None);
        let svcs = stacked(charts[2]);
        draw_series_chart(f, svcs[0], "Services CPU", &d.service_cpu, None);
        draw_series_chart(f, svcs[1], "Services memory", &d.service_mem, None);
    }
}
