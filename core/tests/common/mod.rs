#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use vintner_core::api::{
    ModelRepository, PredictionWorkflow, TaskCoordinator, TaskStatus, FIELD_NAMES,
};
use vintner_core::model::{DecisionTree, OneHotColumn, Pipeline, RandomForest, StandardScaler, TreeNode};

pub const RED_ROW: &str = "7.4;0.7;0;1.9;0.076;11;34;0.9978;3.51;0.56;9.4;5;red";
pub const WHITE_ROW: &str = "7;0.27;0.36;20.7;0.045;45;170;1.001;3;0.45;12.8;6;white";

/// Forest over (Color, Alcohol): alcohol above 11 predicts 7, otherwise 5.
pub fn demo_pipeline(version: &str) -> Pipeline {
    Pipeline {
        name: "wine_quality_pipeline".to_string(),
        version: version.to_string(),
        categorical: vec![OneHotColumn {
            column: "Color".to_string(),
            categories: vec!["red".to_string(), "white".to_string()],
        }],
        numerical: vec!["Alcohol".to_string()],
        scaler: StandardScaler {
            mean: vec![0.0, 11.0],
            scale: vec![1.0, 1.0],
        },
        forest: RandomForest {
            classes: vec![5, 7],
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 1,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf {
                        value: vec![9.0, 1.0],
                    },
                    TreeNode::Leaf {
                        value: vec![2.0, 8.0],
                    },
                ],
            }],
        },
    }
}

/// Write the demo artifact under `dir` and build a coordinator around it.
pub fn coordinator(dir: &Path, max_workers: usize) -> TaskCoordinator {
    let models_dir = dir.join("trained_models");
    std::fs::create_dir_all(&models_dir).unwrap();
    std::fs::write(
        models_dir.join("wine_quality_pipeline_0.1.0.json"),
        serde_json::to_vec(&demo_pipeline("0.1.0")).unwrap(),
    )
    .unwrap();

    let models = Arc::new(ModelRepository::new(
        models_dir,
        "wine_quality_pipeline",
        "0.1.0",
        None,
    ));
    let features = vintner_core::config::ModelConfig::default().features;
    TaskCoordinator::new(Arc::new(PredictionWorkflow::new(models, features)), max_workers)
}

/// Header in raw training-file form ("fixed acidity", ...), then the rows.
pub fn write_upload(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let header: Vec<String> = FIELD_NAMES.iter().map(|f| raw_header(f)).collect();
    let mut body = header.join(";");
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// "FreeSulfurDioxide" → "free sulfur dioxide"; "PH" stays "pH".
fn raw_header(field: &str) -> String {
    if field == "PH" {
        return "pH".to_string();
    }
    let mut out = String::new();
    for (i, c) in field.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push(' ');
        }
        out.extend(c.to_lowercase());
    }
    out
}

pub async fn wait_for_result(coordinator: &TaskCoordinator, id: &str) -> TaskStatus {
    for _ in 0..500 {
        if coordinator.get_result(id).await.is_some() {
            return coordinator.get_status(id).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {id} did not finish in time");
}

/// Inputs are deleted right after the terminal write; poll briefly for it.
pub async fn wait_until_removed(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
