use clap::{Parser, Subcommand};
use sketch_critique_common::SketchType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sketch-critique")]
#[command(about = "スケッチAI講評・再評価レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スケッチ画像を評価して保存
    Evaluate {
        /// 画像ファイル（PNG/JPEG）
        #[arg(required = true)]
        image: PathBuf,

        /// 作者名（省略時は対話入力）
        #[arg(short, long)]
        artist: Option<String>,

        /// 評価モード (quick sketch/full realism)
        #[arg(short = 't', long)]
        sketch_type: Option<SketchType>,

        /// 作品の説明
        #[arg(short, long)]
        description: Option<String>,

        /// 制作日 YYYY-MM-DD（省略時はEXIF日付）
        #[arg(long)]
        date: Option<String>,

        /// 評価モデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,

        /// アップロード・保存せずに評価のみ実行
        #[arg(long)]
        dry_run: bool,
    },

    /// 評価済みアートワークの一覧
    List {
        /// タイトル・説明で検索
        #[arg(short, long)]
        search: Option<String>,

        /// 表示件数
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// アートワーク1件の評価を表示
    Show {
        /// アートワークID
        #[arg(required = true)]
        id: String,
    },

    /// 保存済みアートワークを再評価して比較レポートを出力
    Batch {
        /// 評価モデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,

        /// 出力ファイル（デフォルト: reports/evaluation_{model}_{timestamp}.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// システムプロンプトを置き換えるファイル
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// 評価モード (quick sketch/full realism)
        #[arg(short = 't', long, default_value = "full realism")]
        sketch_type: SketchType,

        /// 評価件数（0で全件）
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// 旧カーブ (18, 8) でカーブスコアを計算
        #[arg(long)]
        legacy_curve: bool,
    },

    /// 再評価レポートをデータストアに反映
    Apply {
        /// レポートファイル（CSV/XLSX）
        #[arg(required = true)]
        report: PathBuf,

        /// タイトルを生成タイトルに置き換える（旧タイトルは説明に残す）
        #[arg(long)]
        retitle: bool,

        /// 更新内容を表示するだけで反映しない
        #[arg(long)]
        dry_run: bool,

        /// evaluation_version に記録するラベル（省略時はレポート名）
        #[arg(long)]
        label: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// OpenAI APIキーを設定
        #[arg(long)]
        set_openai_key: Option<String>,

        /// 既定の評価モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl ExportFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both));
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert!(ExportFormat::Both.includes_csv() && ExportFormat::Both.includes_excel());
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::parse_from(["sketch-critique", "batch"]);
        match cli.command {
            Commands::Batch { limit, format, sketch_type, legacy_curve, .. } => {
                assert_eq!(limit, 5);
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(sketch_type, SketchType::FullRealism);
                assert!(!legacy_curve);
            }
            _ => panic!("batch 以外にパースされた"),
        }
    }

    #[test]
    fn test_batch_quick_sketch_all() {
        let cli = Cli::parse_from([
            "sketch-critique", "batch", "--sketch-type", "quick sketch", "--limit", "0", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Batch { limit, sketch_type, .. } => {
                assert_eq!(limit, 0);
                assert_eq!(sketch_type, SketchType::QuickSketch);
            }
            _ => panic!("batch 以外にパースされた"),
        }
    }

    #[test]
    fn test_invalid_sketch_type_rejected() {
        assert!(Cli::try_parse_from(["sketch-critique", "batch", "--sketch-type", "watercolor"]).is_err());
    }
}
