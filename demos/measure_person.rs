//! Measures a person from a front and a side photo.
//!
//! This example shows how to:
//! - Configure a client from the environment
//! - Upload photos to start a calculation
//! - Poll the queue until the calculation finishes
//! - Report classified failures or the computed girths
//!
//! Run with:
//! `SAIA_API_KEY=... cargo run --example measure_person -- front.jpg side.jpg female 170 65`

use saia::{Client, CreatePersonWithImagesParams, Gender, PhotoFlow, QueueResponse};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const MAX_POLLS: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("saia=debug,measure_person=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [front, side, gender, height, weight] = args.as_slice() else {
        eprintln!("usage: measure_person <front.jpg> <side.jpg> <male|female> <height cm> <weight kg>");
        std::process::exit(2);
    };

    let gender = match gender.as_str() {
        "male" => Gender::Male,
        "female" => Gender::Female,
        other => return Err(format!("unknown gender {other:?}").into()),
    };

    let mut builder = Client::builder()
        .api_key(std::env::var("SAIA_API_KEY")?)
        .timeout(Duration::from_secs(60));
    if let Ok(host) = std::env::var("SAIA_API_HOST") {
        builder = builder.api_host(host);
    }
    let client = builder.build()?;

    println!("=== Uploading photos ===");
    let handle = client
        .persons()
        .create_with_images(&CreatePersonWithImagesParams {
            gender,
            height: height.parse()?,
            weight: weight.parse()?,
            front_image: std::fs::read(front)?,
            side_image: std::fs::read(side)?,
            phone_position: None,
            photo_flow: Some(PhotoFlow::Friend),
        })
        .await?;
    println!("Task set: {}", handle.task_set_id);

    println!("=== Waiting for the calculation ===");
    for attempt in 1..=MAX_POLLS {
        match client.queue().get(handle.task_set_id).await? {
            QueueResponse::Person(person) => {
                println!("Person {} measured", person.id);
                if let Some(volume) = &person.volume_params {
                    for (name, value) in volume.numeric() {
                        println!("  {name}: {value:.1}");
                    }
                }
                return Ok(());
            }
            QueueResponse::TaskSet(task_set) if task_set.is_failed() => {
                println!("Calculation failed:");
                for sub_task in task_set.failed_sub_tasks() {
                    println!(
                        "  {} -> {} ({})",
                        sub_task.name,
                        sub_task.error_code(),
                        sub_task.message
                    );
                }
                return Ok(());
            }
            QueueResponse::TaskSet(task_set) if task_set.is_succeeded() => {
                println!("Calculation succeeded; fetch the person to read its parameters");
                return Ok(());
            }
            QueueResponse::TaskSet(task_set) => {
                println!(
                    "  attempt {attempt}: ready={} successful={}",
                    task_set.is_ready, task_set.is_successful
                );
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }

    Err("calculation did not finish in time".into())
}
