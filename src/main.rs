use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use gurshabad::{
    application::{
        error::AppError,
        navigation::{BindOutcome, Control, NavigationController},
        ports::Storage,
        renderer::{AngRenderer, RenderOutcome},
    },
    config::{self, RenderArgs},
    domain::ang::AngNumber,
    infra::{
        banidb::BaniDbClient,
        error::InfraError,
        http::{self, HttpState},
        storage::FileStorage,
        telemetry,
    },
    presentation::views::{compose_viewer, render_markup},
};
use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(settings, args).await,
    }
}

struct ApplicationContext {
    renderer: AngRenderer,
    storage: Arc<dyn Storage>,
}

fn build_application_context(settings: &config::Settings) -> Result<ApplicationContext, AppError> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(settings.storage.path.clone()));
    let provider = BaniDbClient::new(&settings.provider)?;

    Ok(ApplicationContext {
        renderer: AngRenderer::new(Arc::new(provider), storage.clone()),
        storage,
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let app = build_application_context(&settings)?;

    let mut navigation = NavigationController::new(app.storage);
    if navigation.bind(&Control::ALL) == BindOutcome::Missing {
        warn!("toolbar controls missing; navigation requests will be ignored");
    }

    let state = HttpState {
        renderer: Arc::new(app.renderer),
        navigation: Arc::new(navigation),
    };
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        addr = %settings.server.addr,
        provider = %settings.provider.base_url,
        storage = %settings.storage.path.display(),
        "viewer listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!("viewer stopped");
    Ok(())
}

async fn run_render(settings: config::Settings, args: RenderArgs) -> Result<(), AppError> {
    let app = build_application_context(&settings)?;

    let ang = match args.ang.as_deref() {
        Some(raw) => AngNumber::from_input(Some(raw)),
        None => NavigationController::new(app.storage).resolve_startup(args.url.as_ref()),
    };

    let (outcome, template) = compose_viewer(&app.renderer, ang, http::NAVIGATE_PATH).await;
    let html = render_markup(template).map_err(|err| AppError::unexpected(err.to_string()))?;

    match args.output.as_ref() {
        Some(path) => {
            tokio::fs::write(path, html.as_bytes())
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
            info!(ang = %ang, path = %path.display(), outcome = outcome.label(), "wrote ang page");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|err| AppError::from(InfraError::from(err)))?;
        }
    }

    match outcome {
        RenderOutcome::Failed { ang } => Err(AppError::unexpected(format!(
            "ang {ang} could not be loaded from the verse provider"
        ))),
        _ => Ok(()),
    }
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
