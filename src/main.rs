use clap::Parser;
use sketch_critique::{apply, batch, cli, config, datastore, display, error, evaluator, export, logging, storage, submit};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use datastore::ArtworkStore;
use evaluator::Evaluator;
use sketch_critique_common::{build_report, ScoreCurve};
use std::path::Path;

fn openai_evaluator(config: &Config, model: Option<String>) -> Result<evaluator::OpenAiEvaluator> {
    evaluator::OpenAiEvaluator::new(
        &config.openai_api_key()?,
        model.unwrap_or_else(|| config.model.clone()),
        config.timeout_seconds,
    )
}

fn cloudinary_store(config: &Config) -> Result<storage::CloudinaryStore> {
    storage::CloudinaryStore::new(
        config.cloudinary_credentials()?,
        config.upload_folder.clone(),
        config.timeout_seconds,
    )
}

fn supabase_store(config: &Config) -> Result<datastore::SupabaseStore> {
    datastore::SupabaseStore::new(config.supabase_credentials()?, config.timeout_seconds)
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Evaluate { image, artist, sketch_type, description, date, model, dry_run } => {
            println!("🎨 sketch-critique - 評価\n");

            let artist_name = match artist {
                Some(name) => name,
                None => submit::prompt_artist_name()?,
            };
            let sketch_type = match sketch_type {
                Some(t) => t,
                None => submit::prompt_sketch_type()?,
            };

            let evaluator = openai_evaluator(&config, model)?;
            let options = submit::SubmitOptions {
                image_path: image,
                artist_name,
                sketch_type,
                description,
                artwork_date: date,
                max_image_size: config.max_image_size,
            };

            let artwork = if dry_run {
                submit::submit_artwork(&evaluator, None, &options).await?
            } else {
                let images = cloudinary_store(&config)?;
                let store = supabase_store(&config)?;
                let persistence = submit::Persistence { images: &images, store: &store };
                submit::submit_artwork(&evaluator, Some(persistence), &options).await?
            };

            println!();
            print!("{}", display::render_artwork(&artwork, config.score_curve));
        }

        Commands::List { search, limit } => {
            let store = supabase_store(&config)?;
            let limit = (limit > 0).then_some(limit);
            let artworks = match search.as_deref() {
                Some(q) => store.search(q, limit).await?,
                None => store.list(limit).await?,
            };
            print!("{}", display::render_artwork_list(&artworks, config.score_curve));
        }

        Commands::Show { id } => {
            let store = supabase_store(&config)?;
            let artwork = store.get(&id).await?;
            print!("{}", display::render_artwork(&artwork, config.score_curve));
        }

        Commands::Batch { model, output, prompt_file, sketch_type, limit, format, legacy_curve } => {
            println!("🔁 sketch-critique - 再評価\n");

            let custom_instructions = match prompt_file {
                Some(path) => Some(std::fs::read_to_string(&path).map_err(|_| {
                    error::SketchCritiqueError::FileNotFound(path.display().to_string())
                })?),
                None => None,
            };

            let evaluator = openai_evaluator(&config, model)?;
            let images = cloudinary_store(&config)?;
            let store = supabase_store(&config)?;
            let curve = if legacy_curve { ScoreCurve::LEGACY } else { config.score_curve };

            let options = batch::BatchOptions {
                sketch_type,
                limit,
                delay: config.request_delay(),
                custom_instructions,
                show_progress: true,
            };
            let outcome = batch::run_batch(&evaluator, &images, &store, &options).await?;

            if outcome.results.is_empty() {
                println!("評価できたアートワークがないため、レポートは出力しません");
                return Ok(());
            }

            let report = build_report(&outcome.results, sketch_type, curve);
            let timestamp = export::timestamp_now();
            let path = export::resolve_output_path(
                output.as_deref(),
                &config.reports_dir,
                evaluator.model(),
                &timestamp,
            );
            let home = dirs::home_dir();
            export::export_report(&report, format, &path, home.as_deref(), &timestamp);

            println!(
                "\n✅ 再評価完了: 成功 {}件 / 失敗 {}件",
                outcome.results.len(),
                outcome.failures.len()
            );
        }

        Commands::Apply { report, retitle, dry_run, label } => {
            println!("📝 sketch-critique - レポート反映\n");

            let records = export::read_report(&report)?;
            println!("✔ {}行を読み込み", records.len());

            let label = label.unwrap_or_else(|| report_label(&report));
            let options = apply::ApplyOptions { retitle, dry_run, label };
            let store = supabase_store(&config)?;
            let summary = apply::apply_report(&store, &records, &options).await?;

            if dry_run {
                for (id, changes) in &summary.planned {
                    println!("{}: {}", id, serde_json::to_string(changes)?);
                }
                println!("\n[dry-run] 更新予定 {}件 / スキップ {}件", summary.planned.len(), summary.skipped);
            } else {
                println!(
                    "\n✅ 更新 {}件 / スキップ {}件 / 失敗 {}件",
                    summary.updated, summary.skipped, summary.failed
                );
            }
        }

        Commands::Config { set_openai_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_openai_key {
                config.set_openai_key(key)?;
                println!("✔ OpenAI APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                let set = |v: bool| if v { "設定済み" } else { "未設定" };
                println!("設定: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  リクエスト間隔: {}ms", config.request_delay_ms);
                println!("  レポート出力先: {}", config.reports_dir.display());
                println!("  スコアカーブ: high={} low={}", config.score_curve.high, config.score_curve.low);
                println!("  OpenAI APIキー: {}", set(config.openai_api_key().is_ok()));
                println!("  Cloudinary: {}", set(config.cloudinary_credentials().is_ok()));
                println!("  Supabase: {}", set(config.supabase_credentials().is_ok()));
            }
        }
    }

    Ok(())
}

/// レポートのファイル名を evaluation_version の既定値にする
fn report_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "re-evaluated".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(());
        }
    };

    if let Err(e) = run(cli, config).await {
        match e.raw_response() {
            Some(raw) => tracing::error!("{}\n{}", e, raw),
            None => tracing::error!("{}", e),
        }
    }

    Ok(())
}
