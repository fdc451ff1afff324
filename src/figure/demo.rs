use super::types::Figure;

/// File name of the built-in demonstration figure.
pub const DEMO_FILE_NAME: &str = "figure1.png";

/// Showcase of the description format. Items whose type starts with `-` are
/// switched off and only document the available options.
const DEMO_JSON: &str = r#"{
    "title": "Plot title",
    "xLabel": "The X axis",
    "yLabel": "The Y axis",
    "fileName": "figure1.png",
    "data": [
        {
            "type": "-line",
            "x": [2, 3, 5, 8, 11],
            "y": [4, 5, 9, 3, 2],
            "pattern": "o-",
            "label": "Curve 1",
            "color": [0.0, 1.0, 0.8]
        },
        {
            "type": "-histogram",
            "x": [[2, 3, 3, 5, 7], [2, 5, 5, 5, 6, 7, 8], [1, 2, 2, 2, 5, 7, 7, 7], [2, 3, 4, 5]],
            "labels": ["Apples", "Oranges", "Berries", "Bananas"],
            "colors": "auto"
        },
        {
            "type": "-boxplot",
            "x": [[2, 3, 3, 5, 7], [2, 5, 5, 5, 6, 7, 8], [1, 2, 2, 2, 5, 7, 7, 7], [2, 3, 4, 5]]
        },
        {
            "type": "-stem",
            "x": [3, 4, 5, 6, 7, 8, 9],
            "y": [1, 1.5, 2.2, 2.9, 3.7, 3.8, 3.9],
            "lineFormat": "b-",
            "markerFormat": "bo"
        },
        {
            "type": "-line",
            "x": [3, 4, 5, 7, 8],
            "y": [2, 1, 5, 9, 1],
            "pattern": "x--",
            "label": "Curve 2",
            "color": [0.6, 1.0, 1.0]
        },
        {
            "type": "stacked",
            "x": [3, 4, 5, 7, 8],
            "y": [[2, 1, 2, 1, 2], [1, 2, 1, 2, 1]],
            "labels": ["Apples", "Oranges"],
            "colors": "auto"
        }
    ]
}"#;

/// The demonstration figure rendered by `render` when no file is given.
///
/// # Errors
///
/// Only fails if the embedded description is malformed.
pub fn demo_figure() -> Result<Figure, serde_json::Error> {
    serde_json::from_str(DEMO_JSON)
}
