use super::*;

const SCENE: &str = r#"{
    "frameRate": 24, "width": 100, "height": 80,
    "instances": [
        {"type": "bitmap", "path": "a.png"},
        {"type": "shape", "strokeStyles": [], "fillStyles": [{"type":"solidColor","red":255,"green":0,"blue":0,"alpha":1}],
         "strokePaths": [], "fillPaths": [{"points":[{"type":"moveTo","p":[0,0]},{"type":"lineTo","p":[10,0]}],"index":0}]},
        {"type": "bitmap", "path": "a.png"}
    ],
    "frames": [
        {"instances": [{"translate":[10,20],"scale":[1,1],"rotation":0,"instanceIndex":0}]},
        {"instances": []}
    ]
}"#;

#[test]
fn parses_and_exposes_scene() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    assert_eq!(
        scene.canvas(),
        Canvas {
            width: 100,
            height: 80
        }
    );
    assert_eq!(scene.frame_rate().as_f64(), 24.0);
    assert_eq!(scene.frame_count(), 2);
    assert_eq!(scene.instances().len(), 3);
    assert_eq!(scene.bitmap_asset_names(), vec!["a.png"]);
    assert_eq!(scene.frame(FrameIndex(0)).unwrap().instances.len(), 1);
}

#[test]
fn frame_out_of_range_is_scene_error() {
    let scene = Scene::from_json_str(SCENE).unwrap();
    assert!(matches!(
        scene.frame(FrameIndex(2)),
        Err(ReelError::Scene(_))
    ));
    assert!(scene.instance(9).is_err());
}

#[test]
fn malformed_json_is_serde_error() {
    let err = Scene::from_json_str("{").unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn missing_file_is_reported() {
    let err = Scene::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
