use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use photo_album::album::Side;
use photo_album::{cli, codec, config, error, render, scanner, store};
use photo_album::{Album, AlbumOptions, Command, UploadReport};
use photo_album_common::{parse_date, DecorationTable};
use cli::{Cli, Commands};
use config::Config;
use error::AlbumError;
use std::path::Path;
use store::{JsonFileStore, PhotoStore};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = Config::load()?;

    if let Commands::Config { set_store, show } = &cli.command {
        if let Some(path) = set_store {
            config.set_store_path(path.clone())?;
            println!("✔ ストアファイルを設定しました");
        }

        if *show {
            println!("設定:");
            println!("  ストア: {}", config.resolve_store_path()?.display());
            println!("  サムネイル最大幅: {}px", config.thumbnail_max_width);
            println!("  サムネイル品質: {}", config.thumbnail_quality);
            println!("  デコレーション: {}", config.decoration_dir);
        }
        return Ok(());
    }

    let store_path = match cli.store {
        Some(path) => path,
        None => config.resolve_store_path()?,
    };
    let store = JsonFileStore::open(&store_path)
        .await
        .with_context(|| format!("open store {}", store_path.display()))?;

    let options = AlbumOptions {
        thumbnail: config.thumbnail_options(),
        decorations: DecorationTable::with_defaults(&config.decoration_dir),
    };
    let mut album = Album::open(store, options).await?;

    match cli.command {
        Commands::Add { paths, dates, exif_date } => {
            println!("📷 photo-album - 写真追加\n");

            let dates = dates
                .iter()
                .map(|d| parse_date(d))
                .collect::<Result<Vec<_>, _>>()?;
            let images = scanner::collect_images(&paths)?;
            let items = scanner::assign_dates(images, &dates, exif_date)?;

            let progress = ProgressBar::new(items.len() as u64);
            progress.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);

            let result = album
                .upload_with_progress(items, |done, _, name| {
                    progress.set_position(done as u64);
                    progress.set_message(name.to_string());
                })
                .await;
            progress.finish_and_clear();

            match result {
                Ok(report) => print_report(&report),
                Err(AlbumError::UploadNotPersisted { report, reason }) => {
                    print_report(&report);
                    offer_retry(&album, AlbumError::Persistence(reason)).await?;
                }
                Err(e) => return Err(e.into()),
            }

            print!("\n{}", render::render_frame(&album.frame()));
        }

        Commands::Remove { id } => {
            let changed = match album.dispatch(Command::Delete(id)).await {
                Ok(outcome) => outcome.is_dirty(),
                Err(e) => {
                    offer_retry(&album, e).await?;
                    true
                }
            };
            if changed {
                println!("✔ 写真を削除しました: #{}", id);
                print!("\n{}", render::render_frame(&album.frame()));
            } else {
                println!("写真が見つかりません: #{}", id);
            }
        }

        Commands::SetDate { id, date } => {
            let date = parse_date(&date)?;
            let changed = match album.dispatch(Command::EditDate(id, date)).await {
                Ok(outcome) => outcome.is_dirty(),
                Err(e) => {
                    offer_retry(&album, e).await?;
                    true
                }
            };
            if changed {
                println!("✔ 日付を変更しました: #{} → {}", id, date);
                print!("\n{}", render::render_frame(&album.frame()));
            } else {
                println!("写真が見つかりません: #{}", id);
            }
        }

        Commands::List => {
            let photos = album.catalog().photos();
            if photos.is_empty() {
                println!("写真がありません");
            }
            for photo in photos {
                println!(
                    "#{:<14} {}  {}  {}",
                    photo.id(),
                    photo.date(),
                    photo.display_date(),
                    photo.filename()
                );
            }
        }

        Commands::Show { spread } => {
            for _ in 1..spread.max(1) {
                if !album.dispatch(Command::Next).await?.is_dirty() {
                    break;
                }
            }
            print!("{}", render::render_frame(&album.frame()));
        }

        Commands::Browse => {
            browse(&mut album).await?;
        }

        Commands::Preview { id, output } => {
            let preview = album.preview(id).ok_or(AlbumError::NotFound(id))?;
            println!("{}", preview.title);
            println!("  {}", preview.subtitle);

            if let Some(output) = output {
                let photo = album.catalog().get(id).ok_or(AlbumError::NotFound(id))?;
                let bytes = codec::decode_data_url(photo.preview_image())?;
                tokio::fs::write(&output, bytes)
                    .await
                    .with_context(|| format!("write {}", output.display()))?;
                println!("✔ 書き出しました: {}", output.display());
            }
        }

        Commands::Decorations { check } => {
            let missing = if check {
                album.decorations().preload_check(Path::new("."))
            } else {
                Vec::new()
            };
            for (year, asset) in album.decorations().entries() {
                if missing.iter().any(|(y, _)| *y == year) {
                    println!("  {}  {}  (見つかりません)", year, asset);
                } else {
                    println!("  {}  {}", year, asset);
                }
            }
            if !missing.is_empty() {
                println!("\n{}件のデコレーションが見つかりません", missing.len());
            }
        }

        Commands::Config { .. } => unreachable!("handled before opening the store"),
    }

    Ok(())
}

fn print_report(report: &UploadReport) {
    println!("✔ {}枚を追加、{}枚を置換", report.added, report.replaced);
    if !report.skipped.is_empty() {
        println!("  読み込めなかったファイル: {}", report.skipped.join(", "));
    }
}

/// 保存失敗時は確認しながら再試行。断られたら最後のエラーで終了
async fn offer_retry<S: PhotoStore>(album: &Album<S>, failure: AlbumError) -> anyhow::Result<()> {
    album
        .persist_with_retry(failure, |e| {
            eprintln!("❌ {}", e);
            Confirm::new()
                .with_prompt("保存を再試行しますか？")
                .default(true)
                .interact()
                .unwrap_or(false)
        })
        .await?;
    println!("✔ 保存しました");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

/// 対話アクション
enum BrowseAction {
    Next,
    Previous,
    Decoration(Side),
    Quit,
}

async fn browse<S: PhotoStore>(album: &mut Album<S>) -> anyhow::Result<()> {
    loop {
        let frame = album.frame();
        print!("\n{}", render::render_frame(&frame));

        let mut actions = Vec::new();
        if frame.bounds.can_advance {
            actions.push(("次へ", BrowseAction::Next));
        }
        if frame.bounds.can_retreat {
            actions.push(("前へ", BrowseAction::Previous));
        }
        if frame.left.as_ref().is_some_and(|p| p.decoration.is_some()) {
            actions.push(("左の装飾を見る", BrowseAction::Decoration(Side::Left)));
        }
        if frame.right.as_ref().is_some_and(|p| p.decoration.is_some()) {
            actions.push(("右の装飾を見る", BrowseAction::Decoration(Side::Right)));
        }
        actions.push(("終了", BrowseAction::Quit));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
        let choice = Select::new()
            .with_prompt("操作")
            .items(&labels)
            .default(0)
            .interact()?;

        match &actions[choice].1 {
            BrowseAction::Next => {
                album.dispatch(Command::Next).await?;
            }
            BrowseAction::Previous => {
                album.dispatch(Command::Previous).await?;
            }
            BrowseAction::Decoration(side) => {
                if let Some(preview) = album.decoration_preview(*side) {
                    println!("\n{} - {}\n  {}", preview.title, preview.subtitle, preview.source);
                }
            }
            BrowseAction::Quit => return Ok(()),
        }
    }
}
