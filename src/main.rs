use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use neurograph::engine::{EngineStatus, FallbackNotice, Mounted};
use neurograph::quality::QualityTransition;
use neurograph::scene::OverlayRole;
use neurograph::{
    EngineConfig, GraphCallbacks, GraphData, GraphEngine, InteractionState, NodeEvent,
    QualityTier, RecordingBackend, RenderBackend, RenderSetSelector, StaticProbe, io, layout,
};

mod cli;

use cli::{Cli, Command, EngineArgs, InteractionArgs};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_graph(path: &Path) -> Result<GraphData> {
    io::load_graph(path).with_context(|| format!("failed to load graph from {}", path.display()))
}

/// File configuration (or defaults) with command-line overrides applied
fn engine_config(args: &EngineArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => io::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(max_nodes) = args.max_nodes {
        config.max_render_nodes = max_nodes;
    }
    if let Some(quality) = args.quality {
        config.initial_quality_tier = quality.into();
    }
    config.validate()?;
    Ok(config)
}

/// Events a host would dispatch for the requested interaction state
fn interaction_events(args: &InteractionArgs) -> Vec<NodeEvent> {
    let mut events = Vec::new();
    if let Some(selected) = &args.selected {
        events.push(NodeEvent::Click(selected.clone()));
    }
    if let Some(hovered) = &args.hovered {
        events.push(NodeEvent::Hover(Some(hovered.clone())));
    }
    events
}

#[derive(Serialize)]
struct NodePosition<'a> {
    id: &'a str,
    position: [f32; 3],
}

fn run_layout(graph_path: &Path) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let positions = layout(&graph.nodes);

    let mut seen = std::collections::HashSet::new();
    let rows: Vec<NodePosition> = graph
        .nodes
        .iter()
        .filter(|node| seen.insert(node.id.as_str()))
        .filter_map(|node| {
            positions.get(&node.id).map(|&position| NodePosition {
                id: &node.id,
                position,
            })
        })
        .collect();
    print_json(&rows)
}

#[derive(Serialize)]
struct Selection<'a> {
    nodes: Vec<&'a str>,
    relationships: Vec<&'a str>,
    dangling: Vec<&'a str>,
}

fn run_select(graph_path: &Path, engine: &EngineArgs, interaction: &InteractionArgs) -> Result<()> {
    let graph = load_graph(graph_path)?;
    let config = engine_config(engine)?;

    let mut state = InteractionState::default();
    for event in interaction_events(interaction) {
        state.apply(&event);
    }
    let mut selector = RenderSetSelector::new(config.max_render_nodes);
    let set = selector.select(&graph.nodes, &graph.relationships, &state);

    print_json(&Selection {
        nodes: set.node_ids(&graph.nodes),
        relationships: set.relationship_ids(&graph.relationships),
        dangling: set
            .dangling
            .iter()
            .map(|&index| graph.relationships[index].id.as_str())
            .collect(),
    })
}

#[derive(Serialize)]
struct Transition {
    frame: u32,
    from: QualityTier,
    to: QualityTier,
}

#[derive(Serialize)]
struct Overlay {
    node_id: String,
    title: String,
    badge: &'static str,
    role: &'static str,
}

#[derive(Serialize)]
struct RenderSummary {
    frames: u32,
    status: EngineStatus,
    transitions: Vec<Transition>,
    overlays: Vec<Overlay>,
    integrity_warnings: usize,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum RenderOutcome {
    Rendered(RenderSummary),
    Fallback(FallbackNotice),
}

struct RenderRun {
    graph: GraphData,
    events: Vec<NodeEvent>,
    frames: u32,
    frame_interval: Duration,
}

fn drive<B: RenderBackend>(mounted: Mounted<B>, run: RenderRun) -> Result<RenderOutcome> {
    let mut engine = match mounted {
        Mounted::Active(engine) => engine,
        Mounted::Fallback(notice) => return Ok(RenderOutcome::Fallback(notice)),
    };

    engine.set_graph(run.graph);
    for event in run.events {
        engine.dispatch(event);
    }

    let start = Instant::now();
    let mut transitions = Vec::new();
    for frame in 0..run.frames {
        let report = engine.tick(start + run.frame_interval * frame)?;
        if let Some(QualityTransition { from, to }) = report.transition {
            transitions.push(Transition { frame, from, to });
        }
    }

    let overlays = engine
        .last_frame()
        .map(|frame| {
            frame
                .overlays
                .iter()
                .map(|overlay| Overlay {
                    node_id: overlay.node_id.clone(),
                    title: overlay.title.clone(),
                    badge: overlay.badge,
                    role: match overlay.role {
                        OverlayRole::Selected => "selected",
                        OverlayRole::Hovered => "hovered",
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = RenderSummary {
        frames: run.frames,
        status: engine.status().clone(),
        transitions,
        overlays,
        integrity_warnings: engine.integrity_warnings(),
    };
    engine.teardown();
    Ok(RenderOutcome::Rendered(summary))
}

fn callbacks() -> GraphCallbacks {
    GraphCallbacks::new()
        .on_node_click(|id| tracing::info!(node = id, "node clicked"))
        .on_node_hover(|id| tracing::info!(node = id.unwrap_or("-"), "node hovered"))
}

#[cfg(feature = "gpu")]
fn mount_gpu(config: EngineConfig, run: RenderRun) -> Result<RenderOutcome> {
    use neurograph::WgpuProbe;
    use neurograph::gpu::{GpuRenderer, create_render_device};

    let mounted = GraphEngine::mount(&WgpuProbe, config, callbacks(), |config| {
        let context = pollster::block_on(create_render_device())?;
        Ok(GpuRenderer::for_config(&context, config))
    })?;
    drive(mounted, run)
}

#[cfg(not(feature = "gpu"))]
fn mount_gpu(config: EngineConfig, run: RenderRun) -> Result<RenderOutcome> {
    use neurograph::WgpuProbe;

    // the probe reports the missing feature, so the backend is never built
    let mounted = GraphEngine::mount(&WgpuProbe, config, callbacks(), |_| {
        Ok(RecordingBackend::new())
    })?;
    drive(mounted, run)
}

fn run_render(
    graph_path: &Path,
    engine: &EngineArgs,
    interaction: &InteractionArgs,
    frames: u32,
    fps: f64,
    gpu: bool,
) -> Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {fps}");
    }
    let config = engine_config(engine)?;
    let run = RenderRun {
        graph: load_graph(graph_path)?,
        events: interaction_events(interaction),
        frames,
        frame_interval: Duration::from_secs_f64(1.0 / fps),
    };

    let outcome = if gpu {
        mount_gpu(config, run)?
    } else {
        let mounted = GraphEngine::mount(&StaticProbe::supported(), config, callbacks(), |_| {
            Ok(RecordingBackend::new())
        })?;
        drive(mounted, run)?
    };
    print_json(&outcome)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Probe => print_json(&neurograph::probe()),
        Command::Layout { graph } => run_layout(&graph),
        Command::Select {
            graph,
            engine,
            interaction,
        } => run_select(&graph, &engine, &interaction),
        Command::Render {
            graph,
            engine,
            interaction,
            frames,
            fps,
            gpu,
        } => run_render(&graph, &engine, &interaction, frames, fps, gpu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use cli::QualityArg;

    #[test]
    fn cli_parses_layout_subcommand() {
        let cli = Cli::try_parse_from(["neurograph", "layout", "graph.json"]).unwrap();
        match cli.command {
            Command::Layout { graph } => assert_eq!(graph, PathBuf::from("graph.json")),
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn cli_parses_render_overrides() {
        let cli = Cli::try_parse_from([
            "neurograph",
            "render",
            "graph.yaml",
            "--max-nodes",
            "10",
            "--quality",
            "low",
            "--selected",
            "n1",
            "--frames",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::Render {
                engine,
                interaction,
                frames,
                fps,
                gpu,
                ..
            } => {
                assert_eq!(engine.max_nodes, Some(10));
                assert_eq!(engine.quality, Some(QualityArg::Low));
                assert_eq!(interaction.selected.as_deref(), Some("n1"));
                assert_eq!(frames, 5);
                assert_eq!(fps, 60.0);
                assert!(!gpu);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_quality() {
        assert!(Cli::try_parse_from(["neurograph", "select", "g.json", "--quality", "ultra"]).is_err());
    }

    #[test]
    fn engine_config_applies_overrides() {
        let args = EngineArgs {
            config: None,
            max_nodes: Some(7),
            quality: Some(QualityArg::High),
        };
        let config = engine_config(&args).unwrap();
        assert_eq!(config.max_render_nodes, 7);
        assert_eq!(config.initial_quality_tier, QualityTier::High);
    }

    #[test]
    fn interaction_events_select_then_hover() {
        let args = InteractionArgs {
            selected: Some("a".into()),
            hovered: Some("b".into()),
        };
        assert_eq!(
            interaction_events(&args),
            vec![
                NodeEvent::Click("a".into()),
                NodeEvent::Hover(Some("b".into()))
            ]
        );
    }
}
