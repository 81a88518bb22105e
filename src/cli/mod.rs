mod prompts;

pub use prompts::*;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{CrError, CrResult};
use crate::localiser::{Localiser, LocaliserConfig, ProgressSink};
use crate::mapping::{ExprMapping, PairMapping};
use crate::orbit::{OrbitTracer, UpdateOrder};
use crate::session::{default_sessions, ModeSettings, SessionStore, Sessions};

/// Mode selection by integer id {1: orbit, 2: localiser}, matching `MODE_ID_TO_NAME` in the
/// reference implementation's `settings/managing.py`.
#[derive(Parser)]
#[command(name = "osipenko")]
#[command(about = "Chain-recurrent set localisation and orbit tracing for 2D discrete dynamical systems")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Skip the interactive prompt and read parameters entirely from flags/session defaults.
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Path to the session file (defaults to `settings/.recent_session`).
    #[arg(long, global = true)]
    pub session_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mode 1: trace a single orbit forward.
    Orbit {
        #[arg(long)]
        x_mapping: Option<String>,
        #[arg(long)]
        y_mapping: Option<String>,
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        start_point: Option<Vec<f64>>,
        #[arg(long)]
        iterations: Option<u32>,
        /// Use the reference implementation's staggered update order instead of the
        /// simultaneous default.
        #[arg(long)]
        staggered: bool,
    },
    /// Mode 2: localise the chain-recurrent set on a rectangular region.
    Localise {
        #[arg(long)]
        x_mapping: Option<String>,
        #[arg(long)]
        y_mapping: Option<String>,
        #[arg(long, num_args = 4, value_names = ["SW_X", "SW_Y", "NE_X", "NE_Y"])]
        area_bounds: Option<Vec<f64>>,
        #[arg(long)]
        cell_density: Option<u32>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        topsort_enabled: bool,
        /// Write the resulting point cloud to a scatter-plot PNG (requires the `plot` feature).
        #[arg(long)]
        plot_output: Option<String>,
    },
}

/// Run the CLI's chosen mode to completion, persisting the session afterwards. Returns the
/// output point arrays so a caller (tests, `main`) can inspect or render them.
pub fn run(cli: &Cli) -> CrResult<(Vec<f32>, Vec<f32>)> {
    let session_path = cli
        .session_path
        .clone()
        .unwrap_or_else(|| SessionStore::default_path().to_string_lossy().into_owned());
    let store = SessionStore::new(&session_path);
    let mut sessions = store.load_or_default(default_sessions());

    let owned_command;
    let command = match &cli.command {
        Some(command) => command,
        None => {
            if cli.non_interactive {
                return Err(CrError::InvalidConfig(
                    "no mode selected: pass `orbit` or `localise` explicitly under \
                     --non-interactive"
                        .to_string(),
                ));
            }
            owned_command = interactive_command(&sessions);
            &owned_command
        }
    };

    let result = match command {
        Command::Orbit {
            x_mapping,
            y_mapping,
            start_point,
            iterations,
            staggered,
        } => {
            let defaults = sessions
                .get("ARBITRARY_MAPPING")
                .and_then(|entry| match entry {
                    ModeSettings::Orbit(settings) => Some(settings.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| match default_sessions()["ARBITRARY_MAPPING"].clone() {
                    ModeSettings::Orbit(settings) => settings,
                    _ => unreachable!(),
                });

            let x_expr = x_mapping.clone().unwrap_or(defaults.x_mapping.clone());
            let y_expr = y_mapping.clone().unwrap_or(defaults.y_mapping.clone());
            let start = start_point
                .as_ref()
                .map(|values| (values[0], values[1]))
                .unwrap_or(defaults.start_point);
            let iterations = iterations.unwrap_or(defaults.iterations);

            let f = ExprMapping::compile(&x_expr)?;
            let g = ExprMapping::compile(&y_expr)?;
            let mapping = PairMapping::new(f, g);
            let order = if *staggered {
                UpdateOrder::Staggered
            } else {
                UpdateOrder::Simultaneous
            };

            let (xs, ys) =
                OrbitTracer::trace(&mapping, start, iterations as usize, order)?;

            sessions.insert(
                "ARBITRARY_MAPPING".to_string(),
                ModeSettings::orbit(1, x_expr, y_expr, start, iterations),
            );

            (xs, ys)
        }
        Command::Localise {
            x_mapping,
            y_mapping,
            area_bounds,
            cell_density,
            depth,
            topsort_enabled,
            plot_output,
        } => {
            let defaults = sessions
                .get("CR_SET_LOCALIZING")
                .and_then(|entry| match entry {
                    ModeSettings::Localiser(settings) => Some(settings.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| match default_sessions()["CR_SET_LOCALIZING"].clone() {
                    ModeSettings::Localiser(settings) => settings,
                    _ => unreachable!(),
                });

            let x_expr = x_mapping.clone().unwrap_or(defaults.x_mapping.clone());
            let y_expr = y_mapping.clone().unwrap_or(defaults.y_mapping.clone());
            let bounds = area_bounds
                .as_ref()
                .map(|values| (values[0], values[1], values[2], values[3]))
                .unwrap_or(defaults.area_bounds);
            let cell_density = cell_density.unwrap_or(defaults.cell_density);
            let depth = depth.unwrap_or(defaults.depth);
            let topsort_enabled = *topsort_enabled || defaults.topsort_enabled;

            let f = ExprMapping::compile(&x_expr)?;
            let g = ExprMapping::compile(&y_expr)?;
            let mapping = PairMapping::new(f, g);

            let config = LocaliserConfig::builder()
                .with_bounds(bounds)
                .with_cell_density(cell_density as usize)
                .with_depth(depth as usize)
                .with_topsort_enabled(topsort_enabled)
                .build()?;

            let mut progress = IndicatifProgressSink::new();
            let output = Localiser::run(&config, &mapping, &mut progress)?;

            if let Some(order) = &output.component_order {
                log::info!("Order of SCC: {:?}", order);
            }

            sessions.insert(
                "CR_SET_LOCALIZING".to_string(),
                ModeSettings::localiser(
                    2,
                    x_expr,
                    y_expr,
                    bounds,
                    cell_density,
                    depth,
                    topsort_enabled,
                ),
            );

            #[cfg(feature = "plot")]
            if let Some(path) = plot_output {
                crate::plot::render_scatter(&output.xs, &output.ys, None, path)?;
            }
            #[cfg(not(feature = "plot"))]
            if plot_output.is_some() {
                log::warn!("plot-output was requested but the `plot` feature is not enabled");
            }

            (output.xs, output.ys)
        }
    };

    if let Err(err) = store.save(&sessions) {
        log::warn!("Failed to persist session file: {err}");
    }

    Ok(result)
}

/// Build a [`Command`] by prompting on stdin, seeding every default from the loaded session
/// rather than the crate-wide hard-coded defaults.
fn interactive_command(sessions: &Sessions) -> Command {
    match prompt_for_mode() {
        1 => {
            let defaults = match sessions.get("ARBITRARY_MAPPING") {
                Some(ModeSettings::Orbit(settings)) => settings.clone(),
                _ => match &default_sessions()["ARBITRARY_MAPPING"] {
                    ModeSettings::Orbit(settings) => settings.clone(),
                    _ => unreachable!(),
                },
            };
            let x_mapping = input_with_default("x mapping", &defaults.x_mapping);
            let y_mapping = input_with_default("y mapping", &defaults.y_mapping);
            let start_x = input_parsed("start x", defaults.start_point.0);
            let start_y = input_parsed("start y", defaults.start_point.1);
            let iterations = input_parsed("iterations", defaults.iterations);
            Command::Orbit {
                x_mapping: Some(x_mapping),
                y_mapping: Some(y_mapping),
                start_point: Some(vec![start_x, start_y]),
                iterations: Some(iterations),
                staggered: false,
            }
        }
        _ => {
            let defaults = match sessions.get("CR_SET_LOCALIZING") {
                Some(ModeSettings::Localiser(settings)) => settings.clone(),
                _ => match &default_sessions()["CR_SET_LOCALIZING"] {
                    ModeSettings::Localiser(settings) => settings.clone(),
                    _ => unreachable!(),
                },
            };
            let x_mapping = input_with_default("x mapping", &defaults.x_mapping);
            let y_mapping = input_with_default("y mapping", &defaults.y_mapping);
            let sw_x = input_parsed("area sw x", defaults.area_bounds.0);
            let sw_y = input_parsed("area sw y", defaults.area_bounds.1);
            let ne_x = input_parsed("area ne x", defaults.area_bounds.2);
            let ne_y = input_parsed("area ne y", defaults.area_bounds.3);
            let cell_density = input_parsed("cell density", defaults.cell_density);
            let depth = input_parsed("depth", defaults.depth);
            Command::Localise {
                x_mapping: Some(x_mapping),
                y_mapping: Some(y_mapping),
                area_bounds: Some(vec![sw_x, sw_y, ne_x, ne_y]),
                cell_density: Some(cell_density),
                depth: Some(depth),
                topsort_enabled: defaults.topsort_enabled,
                plot_output: None,
            }
        }
    }
}

/// `indicatif`-backed [`ProgressSink`], the idiomatic direct replacement for the reference
/// implementation's `tqdm`/`trange` progress bar over the depth-refinement loop.
pub struct IndicatifProgressSink {
    bar: Option<ProgressBar>,
}

impl IndicatifProgressSink {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for IndicatifProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for IndicatifProgressSink {
    fn start(&mut self, total_steps: usize) {
        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} depth steps ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar = Some(bar);
    }

    fn step(&mut self, step: usize, active_leaves: usize) -> bool {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{active_leaves} active leaves"));
            bar.set_position(step as u64);
        }
        true
    }

    fn finish(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
