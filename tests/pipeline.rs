mod common;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use jigsaw_solver::edges::EdgeKind;
use jigsaw_solver::{solve, CornerMethod, Level, PieceKind, ProgressSink, RunContext, SolveError, SolverConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jigsaw-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config() -> SolverConfig {
    SolverConfig {
        parallel: false,
        ..SolverConfig::default()
    }
}

/// Records every message and image name it is handed.
#[derive(Clone, Default)]
struct Recorder {
    messages: Arc<Mutex<Vec<(Level, String)>>>,
    images: Arc<Mutex<Vec<String>>>,
}

impl ProgressSink for Recorder {
    fn message(&self, level: Level, text: &str) {
        self.messages.lock().unwrap().push((level, text.to_string()));
    }

    fn image(&self, name: &str, _image: &DynamicImage) {
        self.images.lock().unwrap().push(name.to_string());
    }
}

/// Two identical corner pieces on a table, each with a notch in its south
/// side and a tab on its east side, solved with the given corner strategy.
fn solve_two_piece_photo(corners: CornerMethod) {
    common::init_logging();
    let dir = scratch_dir(&format!("pipeline-{:?}", corners));
    common::synthetic_pieces::photo(2, 60, 40)
        .save(dir.join("table.png"))
        .unwrap();

    let config = SolverConfig { corners, ..config() };
    let puzzle = solve(&dir, &config, &RunContext::default()).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(puzzle.pieces.len(), 2);
    for piece in &puzzle.pieces {
        assert_eq!(piece.corners.len(), 4, "{:?} piece {}: {:?}", corners, piece.id, piece.corners);
        assert_eq!(
            piece.edge_kinds(),
            vec![EdgeKind::Line, EdgeKind::Hole, EdgeKind::Bulb, EdgeKind::Line],
            "{:?} piece {}",
            corners,
            piece.id
        );
        assert_eq!(piece.kind, Some(PieceKind::Corner));
        assert!(piece.placement.is_some());
    }
    assert_eq!(puzzle.solution_count(), 1);
    assert_eq!(puzzle.assembly.solutions[0].grid.piece_count(), 2);
}

#[test]
fn photo_solves_with_polar_corners() {
    solve_two_piece_photo(CornerMethod::Polar);
}

#[test]
fn photo_solves_with_feature_corners() {
    solve_two_piece_photo(CornerMethod::Features);
}

#[test]
fn photo_solves_with_max_quad_corners() {
    solve_two_piece_photo(CornerMethod::MaxQuad);
}

#[test]
fn debug_images_go_to_the_sink() {
    let dir = scratch_dir("debug");
    common::synthetic_pieces::photo(2, 60, 40)
        .save(dir.join("table.png"))
        .unwrap();
    let recorder = Recorder::default();
    let ctx = RunContext::new(Box::new(recorder.clone()));
    let config = SolverConfig {
        debug_images: true,
        ..config()
    };
    solve(&dir, &config, &ctx).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    let mut images = recorder.images.lock().unwrap().clone();
    images.sort();
    assert_eq!(images, vec!["edges_0", "edges_1", "mask_0"]);
    let messages = recorder.messages.lock().unwrap();
    assert!(messages.iter().any(|(_, m)| m.starts_with("Result")));
    assert!(messages.iter().all(|(level, _)| *level == Level::Info));
}

#[test]
fn folder_without_pieces_is_an_error() {
    let dir = scratch_dir("blank");
    image::RgbImage::from_pixel(50, 50, image::Rgb([30, 140, 60]))
        .save(dir.join("empty.png"))
        .unwrap();
    let err = solve(&dir, &config(), &RunContext::default()).unwrap_err();
    std::fs::remove_dir_all(&dir).unwrap();
    assert!(matches!(err, SolveError::NoPieces));
}

#[test]
fn unreadable_photos_are_skipped() {
    let dir = scratch_dir("broken");
    std::fs::write(dir.join("a_broken.jpg"), b"not a jpeg").unwrap();
    common::synthetic_pieces::photo(1, 60, 40)
        .save(dir.join("b_table.png"))
        .unwrap();
    let recorder = Recorder::default();
    let ctx = RunContext::new(Box::new(recorder.clone()));
    let puzzle = solve(&dir, &config(), &ctx).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(puzzle.pieces.len(), 1);
    assert_eq!(puzzle.pieces[0].source, 1);
    let messages = recorder.messages.lock().unwrap();
    assert!(messages.iter().any(|(level, m)| *level == Level::Warning && m.contains("a_broken.jpg")));
}
