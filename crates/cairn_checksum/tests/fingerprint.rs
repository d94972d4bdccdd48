//! End-to-end fingerprinting of single units: input selection, ordering,
//! determinism and memoization.

mod common;

use cairn_checksum::{ChecksumError, ProjectInputCalculator};
use cairn_common::HashAlgorithm;
use cairn_config::{CacheConfig, ConfigError};
use cairn_model::{ConfigTree, DigestType, Plugin};
use common::{calculator, config, file_values, Workspace};

fn sample_unit(ws: &Workspace) {
    ws.write("app/src/main/java/com/acme/App.java", "class App {}\n");
    ws.write("app/src/main/java/com/acme/Util.java", "class Util {}\r\n");
    ws.write("app/src/main/resources/app.properties", "name=app\n");
    ws.write("app/src/test/java/com/acme/AppTest.java", "class AppTest {}\n");
}

#[test]
fn checksum_is_deterministic() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let project = ws.project("app");

    let first = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    let second = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_eq!(first.checksum(), second.checksum());
    assert_eq!(first, second);
}

#[test]
fn items_are_pom_then_sorted_files() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let info = calculator(&ws, config(""), &[])
        .calculate_input(&ws.project("app"))
        .unwrap();

    assert_eq!(info.items()[0].item_type(), DigestType::Pom);
    assert_eq!(
        file_values(&info),
        [
            "src/main/java/com/acme/App.java",
            "src/main/java/com/acme/Util.java",
            "src/main/resources/app.properties",
            "src/test/java/com/acme/AppTest.java",
        ]
    );
}

#[test]
fn checksum_folds_item_hashes_in_category_order() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let info = calculator(&ws, config(""), &[])
        .calculate_input(&ws.project("app"))
        .unwrap();

    let fold = |hashes: &[&str]| {
        let mut checksum = HashAlgorithm::Xx.create_checksum(hashes.len());
        for hash in hashes {
            checksum.update_hash(hash).unwrap();
        }
        checksum.digest().unwrap()
    };
    let hashes: Vec<&str> = info.items().iter().map(|i| i.hash()).collect();
    assert_eq!(fold(hashes.as_slice()), info.checksum());

    let mut reordered = hashes.clone();
    reordered.rotate_left(1);
    assert_ne!(fold(reordered.as_slice()), info.checksum());
}

#[test]
fn same_sources_in_different_checkouts_match() {
    let left = Workspace::new();
    let right = Workspace::new();
    sample_unit(&left);
    // Same files, created in reverse order.
    right.write("app/src/test/java/com/acme/AppTest.java", "class AppTest {}\n");
    right.write("app/src/main/resources/app.properties", "name=app\n");
    right.write("app/src/main/java/com/acme/Util.java", "class Util {}\r\n");
    right.write("app/src/main/java/com/acme/App.java", "class App {}\n");

    let a = calculator(&left, config(""), &[])
        .calculate_input(&left.project("app"))
        .unwrap();
    let b = calculator(&right, config(""), &[])
        .calculate_input(&right.project("app"))
        .unwrap();
    assert_eq!(file_values(&a), file_values(&b));
    assert_eq!(a.checksum(), b.checksum());
}

#[test]
fn content_change_changes_checksum() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let project = ws.project("app");
    let before = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    ws.write("app/src/main/java/com/acme/App.java", "class App { int x; }\n");
    let after = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_ne!(before.checksum(), after.checksum());
}

#[test]
fn build_output_never_included() {
    let ws = Workspace::new();
    sample_unit(&ws);
    ws.write("app/target/generated-sources/Gen.java", "class Gen {}\n");
    let mut project = ws.project("app");
    project.properties.insert("remote.cache.input.all".to_string(), "target".to_string());

    let info = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert!(file_values(&info).iter().all(|v| !v.starts_with("target/")));
}

#[test]
fn java_glob_skips_other_and_hidden_files() {
    let ws = Workspace::new();
    ws.write("app/src/main/java/A.java", "class A {}\n");
    ws.write("app/src/main/java/A.txt", "text\n");
    ws.write("app/src/main/java/.B.java", "class B {}\n");

    let info = calculator(&ws, config("[input.global]\nglob = \"{*.java}\"\n"), &[])
        .calculate_input(&ws.project("app"))
        .unwrap();
    assert_eq!(file_values(&info), ["src/main/java/A.java"]);
}

#[test]
fn unit_properties_override_inputs() {
    let ws = Workspace::new();
    sample_unit(&ws);
    ws.write("app/docs/guide.md", "# guide\n");
    ws.write("app/src/main/java/com/acme/legacy/Old.java", "class Old {}\n");

    let mut project = ws.project("app");
    project
        .properties
        .insert("remote.cache.input.glob".to_string(), "{*.java,*.md}".to_string());
    project
        .properties
        .insert("remote.cache.input.docs".to_string(), "docs".to_string());
    project
        .properties
        .insert("remote.cache.exclude.legacy".to_string(), "src/main/java/com/acme/legacy".to_string());

    let info = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_eq!(
        file_values(&info),
        [
            "docs/guide.md",
            "src/main/java/com/acme/App.java",
            "src/main/java/com/acme/Util.java",
            "src/test/java/com/acme/AppTest.java",
        ]
    );
}

#[test]
fn excluded_file_ignored_inside_walked_directory() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let mut project = ws.project("app");
    project.properties.insert(
        "remote.cache.exclude.util".to_string(),
        "src/main/java/com/acme/Util.java".to_string(),
    );

    let before = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_eq!(
        file_values(&before),
        [
            "src/main/java/com/acme/App.java",
            "src/main/resources/app.properties",
            "src/test/java/com/acme/AppTest.java",
        ]
    );

    ws.write("app/src/main/java/com/acme/Util.java", "class Util { int changed; }\n");
    let after = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_eq!(before.checksum(), after.checksum());
}

#[test]
fn global_includes_and_excludes_apply() {
    let ws = Workspace::new();
    sample_unit(&ws);
    ws.write("app/src/assembly/dist.xml", "<assembly/>\n");
    ws.write("app/src/assembly/nested/extra.xml", "<assembly/>\n");
    ws.write("app/src/main/java/com/acme/gen/Gen.java", "class Gen {}\n");

    let config = config(
        r#"
[input.global]
excludes = ["src/main/java/com/acme/gen"]
[[input.global.includes]]
path = "src/assembly"
glob = "*.xml"
recursive = false
"#,
    );
    let info = calculator(&ws, config, &[]).calculate_input(&ws.project("app")).unwrap();
    let values = file_values(&info);
    assert!(values.contains(&"src/assembly/dist.xml".to_string()));
    assert!(!values.contains(&"src/assembly/nested/extra.xml".to_string()));
    assert!(!values.iter().any(|v| v.contains("/gen/")));
}

#[test]
fn plugin_configuration_paths_scanned() {
    let ws = Workspace::new();
    sample_unit(&ws);
    ws.write("app/src/main/xsd/order.xsd", "<schema/>\n");
    ws.write("app/src/main/xsd/order.txt", "ignored\n");

    let mut project = ws.project("app");
    let mut plugin = Plugin::new("org.codehaus.mojo", "jaxb2-maven-plugin");
    plugin.configuration = Some(
        ConfigTree::new("configuration")
            .with_child(ConfigTree::leaf("schemaDirectory", "src/main/xsd"))
            .with_child(ConfigTree::leaf("packageName", "com.acme.model")),
    );
    project.model.build.plugins.push(plugin);

    let config = config(
        r#"
[[input.plugins]]
artifact_id = "jaxb2-maven-plugin"
[[input.plugins.dir_scan.includes]]
tag_name = "schemaDirectory"
glob = "*.xsd"
"#,
    );
    let info = calculator(&ws, config, &[]).calculate_input(&project).unwrap();
    assert!(file_values(&info).contains(&"src/main/xsd/order.xsd".to_string()));
    assert!(!file_values(&info).contains(&"src/main/xsd/order.txt".to_string()));

    project
        .properties
        .insert("remote.cache.processPlugins".to_string(), "false".to_string());
    let config = common::config(
        r#"
[[input.plugins]]
artifact_id = "jaxb2-maven-plugin"
[[input.plugins.dir_scan.includes]]
tag_name = "schemaDirectory"
glob = "*.xsd"
"#,
    );
    let info = calculator(&ws, config, &[]).calculate_input(&project).unwrap();
    assert!(!file_values(&info).contains(&"src/main/xsd/order.xsd".to_string()));
}

#[test]
fn aggregator_units_have_no_files() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let mut project = ws.project("app");
    project.model.packaging = "pom".to_string();
    let info = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap();
    assert_eq!(info.items().len(), 1);
    assert_eq!(info.items()[0].item_type(), DigestType::Pom);
}

#[test]
fn second_request_is_memoized() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let project = ws.project("app");
    let calculator = calculator(&ws, config(""), &[]);

    let first = calculator.calculate_input(&project).unwrap();
    let after_first = calculator.stats();
    assert_eq!(after_first.calculations, 1);
    assert!(after_first.walks > 0);

    let second = calculator.calculate_input(&project).unwrap();
    let after_second = calculator.stats();
    assert_eq!(first, second);
    assert_eq!(after_second.walks, after_first.walks);
    assert_eq!(after_second.calculations, 1);
    assert_eq!(after_second.cache_hits, 1);
    assert_eq!(calculator.cached(&project.key()), Some(first));
}

#[test]
fn unreadable_glob_is_reported() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let mut project = ws.project("app");
    project
        .properties
        .insert("remote.cache.input.glob".to_string(), "{*.java".to_string());
    let err = calculator(&ws, config(""), &[]).calculate_input(&project).unwrap_err();
    assert!(matches!(err, ChecksumError::InvalidGlob { .. }));
}

#[test]
fn disabled_configuration_is_a_usage_error() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let calculator = ProjectInputCalculator::new(
        CacheConfig::disabled(),
        cairn_checksum::EffectiveModels,
        cairn_checksum::Reactor::default(),
        ws.repository(),
    );
    let err = calculator.calculate_input(&ws.project("app")).unwrap_err();
    assert!(matches!(err, ChecksumError::Config(ConfigError::Disabled)));
}

#[test]
fn algorithm_follows_configuration() {
    let ws = Workspace::new();
    sample_unit(&ws);
    let calculator = calculator(&ws, config("[cache]\nhash_algorithm = \"SHA-256\"\n"), &[]);
    let record = calculator.build_info(&ws.project("app")).unwrap();
    assert_eq!(record.hash_function, "SHA-256");
    assert_eq!(record.projects_input_info.checksum().len(), 64);
}
