//! fingerjoint CLI - finger joint layouts from the command line
//!
//! Resolves layouts for a given overlap length, plans joints between two
//! axis-aligned boards and manages sizing policy files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fingerjoint::math::Point3;
use fingerjoint::{
    resolve, AxisDirection, CuboidKernel, CuboidSet, JointCut, JointPlan, JointPlanner,
    LayoutResult, Placement, SizeMode, SizingPolicy,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fingerjoint")]
#[command(about = "Finger joint layout and planning", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the finger/notch layout for an overlap length
    Layout {
        /// Overlap length along the joint axis
        #[arg(long)]
        size: f64,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Plan a joint between two axis-aligned boards
    Plan {
        /// First board as minx,miny,minz,maxx,maxy,maxz (keeps the fingers)
        #[arg(long, value_parser = parse_board, allow_hyphen_values = true)]
        a: Board,
        /// Second board as minx,miny,minz,maxx,maxy,maxz
        #[arg(long, value_parser = parse_board, allow_hyphen_values = true)]
        b: Board,
        /// Joint axis
        #[arg(long, value_enum, default_value_t = AxisArg::Z)]
        axis: AxisArg,
        /// Print the cut boards instead of the tool bodies
        #[arg(long)]
        cut: bool,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Print or write the default sizing policy
    Defaults {
        /// Write to this file (.toml or .json) instead of printing
        #[arg(long)]
        write: Option<PathBuf>,
        /// Print as TOML instead of JSON
        #[arg(long)]
        toml: bool,
    },
}

/// Sizing policy sources: a policy file, then individual overrides.
#[derive(Args, Default)]
struct PolicyArgs {
    /// Policy file (.toml or .json) to start from
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Which unit type sits at the ends
    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,
    /// Which length is fixed
    #[arg(long, value_enum)]
    size_mode: Option<SizeModeArg>,
    /// Placement as a stored parameter code (0-3)
    #[arg(long, conflicts_with = "placement")]
    placement_code: Option<u32>,
    /// Size mode as a stored parameter code (0 fixed notch, 1 fixed finger, 2 equal)
    #[arg(long, conflicts_with = "size_mode")]
    size_mode_code: Option<u32>,
    /// Fix the number of fingers
    #[arg(long)]
    fingers: Option<u32>,
    /// Finger length for --size-mode fixed-finger
    #[arg(long)]
    finger_length: Option<f64>,
    /// Notch length for --size-mode fixed-notch
    #[arg(long)]
    notch_length: Option<f64>,
    /// Minimum finger length when the count is dynamic
    #[arg(long)]
    min_finger: Option<f64>,
    /// Minimum notch length when the count is dynamic
    #[arg(long)]
    min_notch: Option<f64>,
    /// Clearance between neighbouring fingers and notches
    #[arg(long)]
    gap: Option<f64>,
    /// Lateral clearance between the tools and the part boundary
    #[arg(long)]
    gap_to_part: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlacementArg {
    FingersOutside,
    NotchesOutside,
    SameCountStartFinger,
    SameCountStartNotch,
}

impl From<PlacementArg> for Placement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::FingersOutside => Placement::FingersOutside,
            PlacementArg::NotchesOutside => Placement::NotchesOutside,
            PlacementArg::SameCountStartFinger => Placement::SameCountStartFinger,
            PlacementArg::SameCountStartNotch => Placement::SameCountStartNotch,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SizeModeArg {
    Equal,
    FixedNotch,
    FixedFinger,
}

impl From<SizeModeArg> for SizeMode {
    fn from(arg: SizeModeArg) -> Self {
        match arg {
            SizeModeArg::Equal => SizeMode::EqualSize,
            SizeModeArg::FixedNotch => SizeMode::FixedNotchSize,
            SizeModeArg::FixedFinger => SizeMode::FixedFingerSize,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl AxisArg {
    fn direction(self) -> AxisDirection {
        let end = match self {
            AxisArg::X => Point3::new(1.0, 0.0, 0.0),
            AxisArg::Y => Point3::new(0.0, 1.0, 0.0),
            AxisArg::Z => Point3::new(0.0, 0.0, 1.0),
        };
        AxisDirection::new(Point3::origin(), end)
    }
}

/// Corner coordinates of an axis-aligned board.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Board {
    min: [f64; 3],
    max: [f64; 3],
}

impl Board {
    fn solid(&self) -> CuboidSet {
        CuboidSet::cuboid(Point3::from(self.min), Point3::from(self.max))
    }
}

fn parse_board(s: &str) -> std::result::Result<Board, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate: {e}"))?;
    let [x0, y0, z0, x1, y1, z1] = values[..] else {
        return Err(format!("expected 6 comma-separated numbers, got {}", values.len()));
    };
    if !(x0 < x1 && y0 < y1 && z0 < z1) {
        return Err("board minimum must be below its maximum on every axis".to_string());
    }
    Ok(Board {
        min: [x0, y0, z0],
        max: [x1, y1, z1],
    })
}

impl PolicyArgs {
    /// Defaults, then the policy file, then the individual flags.
    fn resolve(&self) -> Result<SizingPolicy> {
        let mut policy = match &self.policy {
            Some(path) => SizingPolicy::load(path)
                .with_context(|| format!("failed to load policy from {}", path.display()))?,
            None => SizingPolicy::default(),
        };

        if let Some(placement) = self.placement {
            policy.placement = placement.into();
        }
        if let Some(size_mode) = self.size_mode {
            policy.size_mode = size_mode.into();
        }
        if let Some(code) = self.placement_code {
            policy.placement = Placement::from_code(code);
        }
        if let Some(code) = self.size_mode_code {
            policy.size_mode = SizeMode::from_code(code);
        }
        if let Some(count) = self.fingers {
            policy.finger_count_fixed = true;
            policy.fixed_finger_count = count;
        }
        if let Some(v) = self.finger_length {
            policy.fixed_finger_length = v;
        }
        if let Some(v) = self.notch_length {
            policy.fixed_notch_length = v;
        }
        if let Some(v) = self.min_finger {
            policy.min_finger_length = v;
        }
        if let Some(v) = self.min_notch {
            policy.min_notch_length = v;
        }
        if let Some(v) = self.gap {
            policy.gap = v;
        }
        if let Some(v) = self.gap_to_part {
            policy.gap_to_part = v;
        }

        policy.validate().context("invalid sizing policy")?;
        Ok(policy)
    }
}

#[derive(Serialize)]
struct CuboidOut {
    min: [f64; 3],
    max: [f64; 3],
}

fn cuboids(solid: &CuboidSet) -> Vec<CuboidOut> {
    solid
        .cuboids()
        .iter()
        .map(|c| CuboidOut {
            min: [c.min.x, c.min.y, c.min.z],
            max: [c.max.x, c.max.y, c.max.z],
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layout { size, policy } => {
            show_layout(size, &policy.resolve()?)?;
        }
        Commands::Plan {
            a,
            b,
            axis,
            cut,
            policy,
        } => {
            plan_boards(a, b, axis, cut, &policy.resolve()?)?;
        }
        Commands::Defaults { write, toml } => {
            show_defaults(write, toml)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn show_layout(size: f64, policy: &SizingPolicy) -> Result<()> {
    info!(
        size,
        placement_code = policy.placement.to_code(),
        size_mode_code = policy.size_mode.to_code(),
        "resolving layout"
    );
    match resolve(size, policy) {
        LayoutResult::NoCutNeeded => println!("no cut needed"),
        LayoutResult::Infeasible(reason) => println!("infeasible: {reason}"),
        LayoutResult::Layout(layout) => {
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }
    Ok(())
}

fn plan_boards(a: Board, b: Board, axis: AxisArg, cut: bool, policy: &SizingPolicy) -> Result<()> {
    let kernel = CuboidKernel::new();
    let planner = JointPlanner::new(&kernel);
    let direction = axis.direction();
    info!(?axis, "planning joint");

    if cut {
        match planner.cut(a.solid(), b.solid(), &direction, policy)? {
            JointCut::Unchanged { .. } => println!("no cut needed"),
            JointCut::Infeasible { reason, .. } => println!("infeasible: {reason}"),
            JointCut::Cut {
                body0,
                body1,
                layout,
            } => {
                let out = serde_json::json!({
                    "layout": layout,
                    "a": cuboids(&body0),
                    "b": cuboids(&body1),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
        }
        return Ok(());
    }

    match planner.plan(&a.solid(), &b.solid(), &direction, policy)? {
        JointPlan::NoCutNeeded => println!("no cut needed"),
        JointPlan::Infeasible(reason) => println!("infeasible: {reason}"),
        JointPlan::Cut(tools) => {
            let out = serde_json::json!({
                "layout": tools.layout,
                "finger_tool": cuboids(&tools.finger_tool),
                "notch_tool": cuboids(&tools.notch_tool),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn show_defaults(write: Option<PathBuf>, toml: bool) -> Result<()> {
    let policy = SizingPolicy::default();
    if let Some(path) = write {
        policy
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote default policy to {}", path.display());
        return Ok(());
    }
    let text = if toml {
        policy.to_toml()?
    } else {
        policy.to_json()?
    };
    println!("{text}");
    Ok(())
}
