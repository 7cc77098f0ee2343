use reclaim::{classify, is_cleanable_dir, Classification, OS_MANAGED_MARKERS, PROJECT_DEPENDENCY_DIRS};
use std::path::{Path, PathBuf};

#[test]
fn test_is_cleanable_dir() {
    // JavaScript
    assert!(
        is_cleanable_dir(Path::new("/Users/dev/web/node_modules")),
        "node_modules should be cleanable"
    );
    assert!(is_cleanable_dir(Path::new("/Users/dev/web/.next")));

    // Python
    assert!(is_cleanable_dir(Path::new("/Users/dev/ml/.venv")));
    assert!(
        is_cleanable_dir(Path::new("/Users/dev/ml/pkg/__pycache__")),
        "__pycache__ should be cleanable"
    );

    // Apple toolchains
    assert!(is_cleanable_dir(Path::new("/Users/dev/Developer/Xcode/DerivedData")));
    assert!(is_cleanable_dir(Path::new("/Users/dev/ios/Pods")));

    // Infrastructure as code
    assert!(is_cleanable_dir(Path::new("/Users/dev/infra/.terraform")));

    // Not cleanable
    assert!(!is_cleanable_dir(Path::new("/Users/dev/web/src")));
    assert!(
        !is_cleanable_dir(Path::new("/Users/dev/web/package.json")),
        "package.json is a manifest, not an output"
    );
    assert!(!is_cleanable_dir(Path::new("/Users/dev/Library")));
}

#[test]
fn test_allowlist_is_safe_outside_os_managed_locations() {
    let parents = ["/Users/dev/projects/app", "relative/dir", "/opt/build-host/src"];
    for parent in parents {
        for name in PROJECT_DEPENDENCY_DIRS {
            let path = PathBuf::from(parent).join(name);
            assert_eq!(
                classify(&path),
                Classification::ProjectDependency,
                "{} should be cleanable",
                path.display()
            );
        }
    }
}

#[test]
fn test_os_managed_locations_are_never_safe() {
    for marker in OS_MANAGED_MARKERS {
        for name in PROJECT_DEPENDENCY_DIRS.iter().chain(["random", "src"].iter()) {
            let path = PathBuf::from(format!("/Users/dev{}some/{}", marker, name));
            assert!(
                !is_cleanable_dir(&path),
                "{} must not be offered",
                path.display()
            );
            assert_eq!(classify(&path), Classification::OsManaged);
        }
    }
}

#[test]
fn test_classification_ignores_filesystem() {
    // Paths that do not exist classify the same as ones that do
    let path = Path::new("/definitely/not/here/target");
    assert!(!path.exists());
    assert!(is_cleanable_dir(path));
}
