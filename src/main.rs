use anyhow::bail;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

mod cli;
mod config;
mod errors;
mod extract;
mod html;
mod images;
mod log;
mod planner;
mod prompt;
mod provider;
mod server;
mod ux;
mod view;
mod wire;

use cli::{Args, Command, GenerateArgs};
use errors::PlannerError;
use images::{HttpProbe, ImageSettings};
use view::{FormInput, Page, Presenter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init(args.debug);

    let cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    let credential = cfg.resolve_credential(args.api_key.as_deref())?;
    tracing::debug!(model = args.model.as_deref().unwrap_or(&cfg.model), credential = ?credential, "configuration loaded");

    let prov = provider::make_provider(&cfg, args.model.clone())?;

    match args.command {
        Command::Serve { bind, port } => {
            let state = server::AppState {
                provider: prov,
                probe: Arc::new(HttpProbe::new(cfg.image_probe_timeout_secs)?),
                images: ImageSettings::from(&cfg),
                configured_key: credential,
                renderer: html::HtmlRenderer::new()?,
            };
            let bind = bind.unwrap_or_else(|| cfg.bind.clone());
            server::run_serve(state, &bind, port.unwrap_or(cfg.port)).await?;
        }
        Command::Generate(opts) => {
            let page = run_generate(&opts, &cfg, prov.as_ref(), &credential).await?;
            print!("{}", ux::render_page(&page));
            if matches!(page, Page::InvalidInput(_) | Page::Failed(_)) {
                std::process::exit(1);
            }
        }
        Command::Models => {
            if credential.is_empty() {
                bail!(PlannerError::MissingCredential);
            }
            let models = prov.list_models(&credential).await?;
            print!("{}", ux::render_models(&models));
        }
    }
    Ok(())
}

async fn run_generate(
    opts: &GenerateArgs,
    cfg: &config::Config,
    prov: &dyn provider::Provider,
    credential: &wire::Credential,
) -> anyhow::Result<Page> {
    let form = FormInput {
        grade: opts.grade.label().to_string(),
        subject: opts.subject.clone(),
        topic: opts.topic.clone(),
        duration: opts.duration.label().to_string(),
        api_key: String::new(),
    };
    let probe = HttpProbe::new(cfg.image_probe_timeout_secs)?;
    let settings = ImageSettings::from(cfg);
    let presenter = Presenter {
        provider: prov,
        probe: &probe,
        images: &settings,
        configured_key: credential,
        resolve_images: !opts.no_images,
    };

    let pb = ux::spinner("Creating your lesson plan...");
    let page = presenter.present(&form, true).await;
    pb.finish_and_clear();
    Ok(page)
}
