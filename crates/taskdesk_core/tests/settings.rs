use taskdesk_core::{AppSettings, Language, SettingsStore, Theme};

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    assert_eq!(store.load(), AppSettings::default());
}

#[test]
fn save_then_load_returns_saved_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

    let settings = AppSettings {
        theme: Theme::Dark,
        language: Language::Russian,
        font_family: "Fira Sans".to_string(),
        font_size: 12,
        confirm_deletion: false,
        volume: 80,
        ..AppSettings::default()
    };
    store.save(&settings).unwrap();

    assert_eq!(store.load(), settings);
    assert!(!dir.path().join("nested").join("settings.json.tmp").exists());
}

#[test]
fn partial_and_malformed_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = SettingsStore::new(&path);

    std::fs::write(&path, r#"{ "theme": "system", "volume": 255 }"#).unwrap();
    let partial = store.load();
    assert_eq!(partial.theme, Theme::System);
    assert_eq!(partial.volume, 100);
    assert!(partial.confirm_deletion);

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(store.load(), AppSettings::default());
}

#[test]
fn reset_removes_stored_settings() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    store
        .save(&AppSettings {
            sound_enabled: false,
            ..AppSettings::default()
        })
        .unwrap();
    store.reset().unwrap();
    store.reset().unwrap();

    assert_eq!(store.load(), AppSettings::default());
}

#[test]
fn settings_serialize_with_snake_case_codes() {
    let json = serde_json::to_value(AppSettings::default()).unwrap();
    assert_eq!(json["theme"], "light");
    assert_eq!(json["language"], "english");
    assert_eq!(json["notification_timeout_secs"], 5);
}
