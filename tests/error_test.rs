//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_album::error::AlbumError;
use photo_album::UploadReport;
use photo_album::scanner;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    let err = result.unwrap_err();
    assert!(err.is_user_input());
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let images = scanner::collect_images(&[dir.path().to_path_buf()]).unwrap();
    assert!(images.is_empty());

    // 空のバッチはアップロード時に入力エラーになる
    let items = scanner::assign_dates(images, &[], false).unwrap();
    assert!(items.is_empty());
}

/// 明示したファイルは拡張子を問わず対象になる
#[test]
fn test_collect_explicit_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("photo.heic");
    std::fs::write(&path, b"dummy").unwrap();

    let images = scanner::collect_images(&[PathBuf::from(&path)]).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].file_name, "photo.heic");
}

/// AlbumErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        AlbumError::UserInput("写真を選択してください".to_string()),
        AlbumError::Decode("broken.jpg".to_string()),
        AlbumError::Persistence("disk full".to_string()),
        AlbumError::NotFound(42),
        AlbumError::Config("テスト設定エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_not_found_message() {
    let err = AlbumError::NotFound(1700000000000);
    assert!(err.to_string().contains("1700000000000"));
    assert!(!err.is_user_input());
}

/// 保存失敗は取り込み結果を保持したまま返る
#[test]
fn test_upload_not_persisted_keeps_report() {
    let err = AlbumError::UploadNotPersisted {
        report: UploadReport {
            added: 2,
            replaced: 1,
            skipped: vec!["broken.jpg".to_string()],
        },
        reason: "disk full".to_string(),
    };

    let display = err.to_string();
    assert!(display.contains("disk full"));
    assert!(display.contains("3枚は反映済み"));
    assert!(display.contains("1枚スキップ"));
    assert!(err.is_persistence());
    assert!(!err.is_user_input());

    assert!(AlbumError::Persistence("disk full".to_string()).is_persistence());
    assert!(!AlbumError::NotFound(1).is_persistence());
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: AlbumError = io_err.into();

    assert!(matches!(err, AlbumError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: AlbumError = json_err.into();

    assert!(matches!(err, AlbumError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = photo_album_common::parse_date("2024-99-99").unwrap_err();
    let err: AlbumError = common_err.into();

    assert!(matches!(err, AlbumError::Common(_)));
    assert_eq!(err.to_string(), "Invalid date: 2024-99-99");
}
