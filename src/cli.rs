use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-album")]
#[command(about = "年別フォトアルバム（見開きブック表示）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ストアファイル（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を追加（同名ファイルは置換）
    Add {
        /// 画像ファイルまたはフォルダ
        paths: Vec<PathBuf>,

        /// 日付 (YYYY-MM-DD)。1つなら全ファイルに適用、複数ならファイル順に対応
        #[arg(short, long = "date")]
        dates: Vec<String>,

        /// 日付未指定のファイルにEXIFの撮影日を使う
        #[arg(long)]
        exif_date: bool,
    },

    /// 写真を削除
    Remove {
        /// 写真ID
        id: i64,
    },

    /// 写真の日付を変更
    SetDate {
        /// 写真ID
        id: i64,

        /// 新しい日付 (YYYY-MM-DD)
        date: String,
    },

    /// 写真一覧（表示順）
    List,

    /// 見開きを表示
    Show {
        /// 見開き番号（1始まり）
        #[arg(short, long, default_value = "1")]
        spread: usize,
    },

    /// 対話的にページをめくる
    Browse,

    /// 写真の詳細を表示
    Preview {
        /// 写真ID
        id: i64,

        /// オリジナル画像を書き出す
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 年別デコレーションの一覧
    Decorations {
        /// アセットファイルの存在を確認
        #[arg(long)]
        check: bool,
    },

    /// 設定を表示/編集
    Config {
        /// ストアファイルのパスを設定
        #[arg(long)]
        set_store: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
