// lottie-data: Serde structs for the Lottie JSON documents we emit
pub mod model;

#[cfg(test)]
mod tests {
    use super::model::*;
    use serde_json::json;

    fn square_group() -> GroupShape {
        let rect = Shape::Rect(RectShape {
            nm: Some("Rectangle".to_string()),
            p: Property::fixed([5.0, 10.0]),
            s: Property::fixed([10.0, 20.0]),
            r: Property::fixed(2.0),
        });
        let fill = Shape::Fill(FillShape {
            nm: Some("Fill".to_string()),
            c: Property::fixed([1.0, 0.0, 0.0, 1.0]),
            o: Property::fixed(100.0),
            r: 1,
        });
        GroupShape::new("rect", vec![rect, fill], Transform::default().with_zero_skew())
    }

    #[test]
    fn test_group_ends_with_transform() {
        let group = square_group();
        assert_eq!(group.it.len(), 3);
        assert_eq!(group.it[2].type_tag(), "tr");
        assert_eq!(group.transform().unwrap().scale(), [100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_serialize_shape_tags() {
        let value = serde_json::to_value(Shape::Group(square_group())).unwrap();
        assert_eq!(value["ty"], "gr");
        assert_eq!(value["it"][0]["ty"], "rc");
        assert_eq!(value["it"][0]["s"], json!({ "a": 0, "k": [10.0, 20.0] }));
        assert_eq!(value["it"][1]["ty"], "fl");
        let tr = &value["it"][2];
        assert_eq!(tr["ty"], "tr");
        assert_eq!(tr["nm"], "Transform");
        assert_eq!(tr["p"], json!({ "a": 0, "k": [0.0, 0.0, 0.0], "ix": 2 }));
        assert_eq!(tr["sk"], json!({ "a": 0, "k": 0.0, "ix": 4 }));
    }

    #[test]
    fn test_layer_transform_omits_skew() {
        let layer = Layer::shape_layer(1, "Frame 1", Transform::default(), vec![], 0.0, 60.0);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["ty"], 4);
        assert_eq!(value["sr"], 1.0);
        assert!(value["ks"].get("sk").is_none());
        assert!(value["ks"].get("sa").is_none());
    }

    #[test]
    fn test_deserialize_path_layer() {
        let data = json!({
            "v": "5.7.1",
            "fr": 30, "ip": 0, "op": 60, "w": 100, "h": 100,
            "nm": "SVG Animation", "ddd": 0,
            "assets": [],
            "layers": [
                {
                    "ddd": 0, "ind": 1, "ty": 4, "nm": "Frame 1", "sr": 1,
                    "ks": {
                        "o": { "a": 0, "k": 100, "ix": 11 },
                        "r": { "a": 0, "k": 0, "ix": 10 },
                        "p": { "a": 0, "k": [50, 50, 0], "ix": 2 },
                        "a": { "a": 0, "k": [50, 50, 0], "ix": 1 },
                        "s": { "a": 0, "k": [100, 100, 100], "ix": 6 }
                    },
                    "ao": 0,
                    "shapes": [
                        {
                            "ty": "sh",
                            "nm": "Path",
                            "ks": { "a": 0, "k": { "v": [[0, 0], [10, 0]], "i": [[0, 0], [0, 0]], "o": [[0, 0], [0, 0]], "c": false } }
                        }
                    ],
                    "ip": 0, "op": 60, "st": 0, "bm": 0
                }
            ],
            "markers": [{ "cm": "intro", "tm": 0, "dr": 10 }]
        });
        let lottie: Animation = serde_json::from_value(data).unwrap();
        let layer = &lottie.layers[0];
        assert_eq!(layer.ty, SHAPE_LAYER);
        assert_eq!(layer.ks.position(), [50.0, 50.0, 0.0]);
        assert_eq!(lottie.markers[0].cm, "intro");
        if let Shape::Path(path) = &layer.shapes[0] {
            assert_eq!(path.ks.k.len(), 2);
            assert!(!path.ks.k.c);
        } else {
            panic!("Expected Path, got {:?}", layer.shapes[0]);
        }
    }

    #[test]
    fn test_document_survives_json() {
        let doc = Animation {
            v: SCHEMA_VERSION.to_string(),
            fr: 30.0,
            ip: 0.0,
            op: 60.0,
            w: 200.0,
            h: 100.0,
            nm: Some("SVG Animation".to_string()),
            ddd: 0,
            assets: vec![],
            layers: vec![Layer::shape_layer(
                1,
                "Frame 1",
                Transform::new([100.0, 50.0], [100.0, 50.0], [100.0, 100.0], 0.0),
                vec![Shape::Group(square_group())],
                0.0,
                60.0,
            )],
            markers: vec![],
        };
        let text = doc.to_json(false).unwrap();
        let back: Animation = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
