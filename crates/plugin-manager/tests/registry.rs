use std::fs;
use std::path::{Path, PathBuf};

use plugin_manager::{PluginManager, RegistryConfig};

const HANDLERS: &str = r#"<?xml version="1.0"?>
<library path="/usr/lib/libhandlers.so">
  <class name="ns::Handler&lt;int&gt;" base_class_name="ns::Base" singleton="true">
    <description>Handles ints</description>
    <associated_classes>
      <class name="ns::Codec"/>
    </associated_classes>
  </class>
  <class name="ns::Handler&lt;string&gt;" base_class_name="ns::Base"/>
</library>
"#;

const CODECS: &str = r#"<library path="/usr/lib/libcodecs.so">
  <class name="ns::Codec" base_class_name="ns::CodecBase"/>
</library>
"#;

const SYSTEM: &str = r#"<library path="/opt/system/lib/libsystem.so">
  <class name="sys::Clock" base_class_name="sys::Service" singleton="true"/>
</library>
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn snapshot(manager: &PluginManager) -> Vec<plugin_manager::ClassRecord> {
    manager.registry().records().cloned().collect()
}

#[test]
fn test_end_to_end_queries() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "handlers.xml", HANDLERS);
    write(dir.path(), "codecs.xml", CODECS);

    let manager = PluginManager::new([dir.path()], false);

    assert_eq!(
        manager.available_classes(),
        vec!["ns::Codec", "ns::Handler<int>", "ns::Handler<string>"]
    );
    assert_eq!(
        manager.available_classes_of("ns::Base"),
        vec!["ns::Handler<int>", "ns::Handler<string>"]
    );
    assert_eq!(manager.class_description("ns::Handler<int>").as_deref(), Some("Handles ints"));
    assert_eq!(manager.singleton_flag("ns::Handler<int>"), Some(true));
    assert_eq!(manager.singleton_flag("ns::Handler<string>"), Some(false));
    assert_eq!(
        manager.associated_classes("ns::Handler<int>"),
        Some(vec!["ns::Codec".to_string()])
    );
    assert_eq!(
        manager.class_library_path("ns::Codec").as_deref(),
        Some("/usr/lib/libcodecs.so")
    );
    assert_eq!(manager.full_class_name("Codec").as_deref(), Some("ns::Codec"));
    assert_eq!(
        manager.associated_class_of_type("int", "ns::Base").as_deref(),
        Some("ns::Handler<int>")
    );
    assert_eq!(manager.associated_class_of_type("float", "ns::Base"), None);

    let info = manager.class_info("ns::Codec").unwrap();
    assert_eq!(info.source_manifest_path, dir.path().join("codecs.xml"));
}

#[test]
fn test_reload_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "handlers.xml", HANDLERS);
    write(dir.path(), "codecs.xml", CODECS);

    let mut manager = PluginManager::new([dir.path()], false);
    let first = snapshot(&manager);
    let summary = manager.reload();
    let second = snapshot(&manager);

    assert_eq!(first, second);
    assert_eq!(summary.classes_loaded, 3);
    assert!(manager.registry().is_consistent());
}

#[test]
fn test_remove_class_info_clears_all_indices() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "handlers.xml", HANDLERS);

    let mut manager = PluginManager::new([dir.path()], false);
    assert!(manager.remove_class_info("ns::Handler<int>"));

    assert!(!manager.available_classes().contains(&"ns::Handler<int>".to_string()));
    assert_eq!(manager.available_classes_of("ns::Base"), vec!["ns::Handler<string>"]);
    assert!(manager.registry().find_by_short_name("Handler<int>").is_empty());
    assert_eq!(manager.associated_class_of_type("int", "ns::Base"), None);
    assert!(manager.registry().is_consistent());

    assert!(!manager.remove_class_info("ns::Handler<int>"));
}

#[test]
fn test_override_paths_keeps_environment_classes() {
    let old_dir = tempfile::tempdir().unwrap();
    write(old_dir.path(), "handlers.xml", HANDLERS);
    let new_dir = tempfile::tempdir().unwrap();
    let codecs = write(new_dir.path(), "codecs.xml", CODECS);

    let prefix = tempfile::tempdir().unwrap();
    let env_folder = prefix.path().join("share/plugin_manager");
    fs::create_dir_all(&env_folder).unwrap();
    write(&env_folder, "system.xml", SYSTEM);

    let variable = "PLUGIN_MANAGER_TEST_OVERRIDE_PREFIX";
    std::env::set_var(variable, prefix.path());
    let config = RegistryConfig {
        plugin_xml_paths: vec![old_dir.path().to_path_buf()],
        load_environment_paths: true,
        environment_variable: variable.to_string(),
        ..RegistryConfig::default()
    };

    let mut manager = PluginManager::from_config(&config);
    assert!(manager.is_class_info_available("ns::Handler<int>"));
    assert!(manager.is_class_info_available("sys::Clock"));

    manager.override_paths([codecs.clone()]);
    assert!(!manager.is_class_info_available("ns::Handler<int>"));
    assert!(!manager.is_class_info_available("ns::Handler<string>"));
    assert!(manager.is_class_info_available("ns::Codec"));
    assert!(manager.is_class_info_available("sys::Clock"));
    assert_eq!(
        manager.plugin_xml_paths(),
        vec![codecs, env_folder.join("system.xml")]
    );

    std::env::remove_var(variable);
}

#[test]
fn test_duplicate_class_last_manifest_wins() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        dir.path(),
        "first.xml",
        r#"<library path="/lib/first.so"><class name="Dup" base_class_name="Base"/></library>"#,
    );
    let second = write(
        dir.path(),
        "second.xml",
        r#"<library path="/lib/second.so"><class name="Dup" base_class_name="Base"/></library>"#,
    );

    let manager = PluginManager::new([first.clone(), second.clone()], false);
    assert_eq!(manager.class_library_path("Dup").as_deref(), Some("/lib/second.so"));
    assert_eq!(manager.available_classes_of("Base"), vec!["Dup"]);

    let manager = PluginManager::new([second, first], false);
    assert_eq!(manager.class_library_path("Dup").as_deref(), Some("/lib/first.so"));
}
