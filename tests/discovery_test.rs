use ddtag::file::{collect_target_images, get_image_files_recursive, DEFAULT_IMAGE_EXTENSIONS};
use std::path::PathBuf;
use tempfile::tempdir;

mod common;
use common::{write_image, write_text};

#[test]
fn test_directory_expansion_is_naturally_sorted() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    for name in ["10.png", "2.jpg", "1.PNG", "sub/3.gif", "sub/20.jpeg"] {
        write_image(&root.join(name), 4, 4, [10, 20, 30]);
    }
    write_text(&root.join("notes.txt"), "not an image");
    write_text(&root.join("sub/model.onnx"), "");

    let images = collect_target_images(&[root], &DEFAULT_IMAGE_EXTENSIONS);
    let expected: Vec<PathBuf> = ["1.PNG", "2.jpg", "10.png", "sub/3.gif", "sub/20.jpeg"]
        .iter()
        .map(|name| root.join(name))
        .collect();
    assert_eq!(images, expected);
}

#[test]
fn test_file_target_is_taken_verbatim() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let notes = root.join("notes.txt");
    write_text(&notes, "given directly");
    write_image(&root.join("dir/5.png"), 4, 4, [0, 0, 0]);

    let images = collect_target_images(
        &[root.join("dir"), notes.clone()],
        &DEFAULT_IMAGE_EXTENSIONS,
    );
    assert_eq!(images, vec![root.join("dir/5.png"), notes]);
}

#[test]
fn test_hidden_entries_are_skipped() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("visible.png"), 4, 4, [1, 2, 3]);
    write_image(&root.join(".hidden.png"), 4, 4, [1, 2, 3]);
    write_image(&root.join(".cache/inside.png"), 4, 4, [1, 2, 3]);

    let images = get_image_files_recursive(root, &DEFAULT_IMAGE_EXTENSIONS);
    assert_eq!(images, vec![root.join("visible.png")]);
}

#[test]
fn test_custom_extensions() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_image(&root.join("a.png"), 4, 4, [1, 2, 3]);
    write_image(&root.join("b.bmp"), 4, 4, [1, 2, 3]);

    let images = collect_target_images(&[root], &["bmp"]);
    assert_eq!(images, vec![root.join("b.bmp")]);
}

#[test]
fn test_duplicates_and_missing_targets() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let image = root.join("1.png");
    write_image(&image, 4, 4, [1, 2, 3]);

    let images = collect_target_images(
        &[image.clone(), root.join("missing"), image.clone()],
        &DEFAULT_IMAGE_EXTENSIONS,
    );
    assert_eq!(images, vec![image.clone(), image]);
}
