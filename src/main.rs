//! Funnel Preview - scripted walk-through of a generated intake flow
//!
//! Analyzes a landing page, generates a flow from a prompt, then plays a
//! visitor through the live preview, logging every update as JSON.

use funnel_preview::flow::{Feature, FlowSteps, MockFlowGenerator};
use funnel_preview::render::progress_label;
use funnel_preview::state_machine::PreviewState;
use funnel_preview::{spawn_preview, Command, Event, PreviewConfig, PreviewUpdate, SimPhase};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LANDING_PAGE_URL: &str = "https://acme.io/pricing";
const FLOW_PROMPT: &str = "SaaS Demo Booking";
/// Intent slider position, 1-3
const INTENT_SLIDER: u8 = 3;
const ANSWERS: &[&str] = &["Founder", "About 40 demos a month", "$10k per month"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "funnel_preview=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = PreviewConfig::from_env();
    tracing::info!(?config, "Starting preview demo");

    let generator = MockFlowGenerator::new(config.generate_delay, config.analyze_delay);
    let handle = spawn_preview(FlowSteps::starter(), config.pacing, generator);
    let mut updates = handle.subscribe();

    // Authoring: infer context, then generate
    handle
        .send(Command::AnalyzePage {
            url: LANDING_PAGE_URL.to_string(),
        })
        .await?;
    let context = next_matching(&mut updates, |u| match u {
        PreviewUpdate::ContextSuggested { context } => Some(context),
        _ => None,
    })
    .await?;
    handle.send(Command::SetContext(context)).await?;
    handle.send(Command::SetIntent(INTENT_SLIDER)).await?;
    handle
        .send(Command::ToggleFeature(Feature::PersonalizedSuccess))
        .await?;

    handle
        .send(Command::Generate {
            prompt: FLOW_PROMPT.to_string(),
        })
        .await?;
    let steps = next_matching(&mut updates, |u| match u {
        PreviewUpdate::FlowLoaded { steps } => Some(steps),
        _ => None,
    })
    .await?;
    tracing::info!(steps = steps.len(), "Flow ready");

    // Visitor: entry form, then one answer per question
    handle
        .dispatch(Event::submit_entry("Jordan Lee", "jordan@acme.io"))
        .await?;

    let mut state = PreviewState::default();
    for answer in ANSWERS.iter().copied().cycle().take(steps.questions().len()) {
        wait_for_prompt(&mut updates, &mut state, &steps).await?;
        handle.dispatch(Event::answer(answer)).await?;
    }

    let (title, content) = next_matching(&mut updates, |u| match u {
        PreviewUpdate::Outcome { title, content } => Some((title, content)),
        _ => None,
    })
    .await?;
    tracing::info!(%title, %content, "Visitor reached the outcome");

    handle.send(Command::Reset).await?;
    next_matching(&mut updates, |u| matches!(u, PreviewUpdate::Reset).then_some(())).await?;
    tracing::info!("Preview reset, demo finished");
    Ok(())
}

/// Log updates until the preview waits on the visitor again
async fn wait_for_prompt(
    updates: &mut broadcast::Receiver<PreviewUpdate>,
    state: &mut PreviewState,
    steps: &FlowSteps,
) -> Result<(), broadcast::error::RecvError> {
    loop {
        let update = recv(updates).await?;
        if let PreviewUpdate::StateChange { phase, cursor } = &update {
            state.phase = *phase;
            state.cursor = *cursor;
            tracing::info!(progress = %progress_label(state, steps), ?phase, "Preview state");
            if phase.is_terminal() || matches!(phase, SimPhase::AwaitingUserInput) {
                return Ok(());
            }
        }
    }
}

/// Skip updates until `select` picks one out; runtime errors abort the demo
async fn next_matching<T>(
    updates: &mut broadcast::Receiver<PreviewUpdate>,
    mut select: impl FnMut(PreviewUpdate) -> Option<T>,
) -> Result<T, Box<dyn std::error::Error>> {
    loop {
        match recv(updates).await? {
            PreviewUpdate::Error { message } => return Err(message.into()),
            update => {
                if let Some(found) = select(update) {
                    return Ok(found);
                }
            }
        }
    }
}

async fn recv(
    updates: &mut broadcast::Receiver<PreviewUpdate>,
) -> Result<PreviewUpdate, broadcast::error::RecvError> {
    loop {
        match updates.recv().await {
            Ok(update) => {
                tracing::debug!(?update, "Preview update");
                return Ok(update);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Update stream lagged");
            }
            Err(e) => return Err(e),
        }
    }
}
