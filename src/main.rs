use std::{
    future::IntoFuture,
    process,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::stream::TryStreamExt;
use scriven::{
    application::{
        activity::ActivityLogService,
        cache::{PostSnapshots, SnapshotCache},
        error::AppError,
        indexing::{BackgroundIndexDispatcher, IndexDispatcher},
        posts::{PostService, PostServiceSettings},
        repos::{ActivityLogsRepo, PostsRepo, PostsWriteRepo},
        search::SearchIndex,
    },
    config,
    domain::entities::SearchDocument,
    infra::{
        cache::RedisSnapshotCache,
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        search::OpenSearchIndex,
        telemetry,
    },
};
use tokio::sync::Notify;
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
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Reindex(args) => run_reindex(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let cache: Arc<dyn SnapshotCache> = Arc::new(
        RedisSnapshotCache::connect(&settings.cache.url)
            .await
            .map_err(|err| AppError::from(InfraError::cache(err.to_string())))?,
    );
    info!(target = "scriven::bootstrap", "connected to snapshot cache");

    let search = init_search_index(&settings)?;
    if let Err(err) = search.ensure_index().await {
        warn!(
            target = "scriven::bootstrap",
            index = %settings.search.index,
            error = %err,
            "failed to prepare search index; search requests will fail until it exists"
        );
    }

    let state = build_api_state(repositories, cache, search, &settings);
    serve_http(&settings, state).await
}

async fn run_reindex(
    settings: config::Settings,
    args: config::ReindexArgs,
) -> Result<(), AppError> {
    if args.concurrency == 0 {
        return Err(AppError::validation("reindex requires --concurrency >= 1"));
    }
    let concurrency = args.concurrency.min(64);

    let repositories = init_repositories(&settings).await?;
    let search = init_search_index(&settings)?;
    search
        .ensure_index()
        .await
        .map_err(|err| AppError::from(InfraError::search(err.to_string())))?;

    info!(
        target = "scriven::reindex",
        concurrency,
        index = %settings.search.index,
        "Starting reindex"
    );

    let total = Arc::new(AtomicUsize::new(0));
    let total_handle = total.clone();

    repositories
        .stream_all_posts()
        .map_err(|err| AppError::unexpected(err.to_string()))
        .try_for_each_concurrent(Some(concurrency), move |post| {
            let search = search.clone();
            let counter = total_handle.clone();
            async move {
                search
                    .upsert(&SearchDocument::from(&post))
                    .await
                    .map_err(|err| {
                        AppError::from(InfraError::search(format!(
                            "failed to index post {}: {err}",
                            post.id
                        )))
                    })?;
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        })
        .await?;

    let count = total.load(Ordering::Relaxed);
    info!(target = "scriven::reindex", posts = count, "Reindexed all posts");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn init_search_index(settings: &config::Settings) -> Result<Arc<dyn SearchIndex>, AppError> {
    let index = OpenSearchIndex::connect(&settings.search.url, settings.search.index.clone())
        .map_err(|err| AppError::from(InfraError::search(err.to_string())))?;
    Ok(Arc::new(index))
}

fn build_api_state(
    repositories: Arc<PostgresRepositories>,
    cache: Arc<dyn SnapshotCache>,
    search: Arc<dyn SearchIndex>,
    settings: &config::Settings,
) -> ApiState {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let logs_repo: Arc<dyn ActivityLogsRepo> = repositories.clone();
    let indexer: Arc<dyn IndexDispatcher> = Arc::new(BackgroundIndexDispatcher::new(search.clone()));

    let snapshots = PostSnapshots::new(
        cache.clone(),
        settings.cache.key_prefix.clone(),
        settings.cache.ttl,
    );

    let posts = Arc::new(PostService::new(
        posts_repo,
        posts_write_repo,
        snapshots,
        search.clone(),
        indexer,
        PostServiceSettings {
            tag_search_warn_threshold: settings.posts.tag_search_warn_threshold,
        },
    ));
    let activity = Arc::new(ActivityLogService::new(logs_repo));

    ApiState {
        posts,
        activity,
        db: repositories,
        cache,
        search,
    }
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "scriven::bootstrap",
        addr = %settings.server.addr,
        "listening for HTTP requests"
    );

    let draining = Arc::new(Notify::new());
    let trigger = draining.clone();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            trigger.notify_one();
        },
    )
    .into_future();

    let grace = settings.server.graceful_shutdown;
    let deadline = async move {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = deadline => {
            warn!(
                target = "scriven::bootstrap",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "scriven::bootstrap", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "scriven::bootstrap", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(target = "scriven::bootstrap", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "scriven::bootstrap", "shutdown signal received");
}
