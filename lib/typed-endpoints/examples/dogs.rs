#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use typed_endpoints::{ClientOptions, EndpointOptions, TypedClient, endpoints};

#[derive(Debug, Deserialize)]
struct DogCeoResult<T> {
    message: T,
    status: String,
}

type BreedsList = DogCeoResult<serde_json::Map<String, serde_json::Value>>;
type BreedImages = DogCeoResult<Vec<String>>;

#[derive(Debug, Serialize)]
struct Breed {
    breed: String,
}

endpoints! {
    DogsApi {
        ListAll = "breeds/list/all" {
            get { result: BreedsList, }
        }
        Images = "breed/:breed/images" {
            get { params: Breed, result: BreedImages, }
        }
        Random = "breed/:breed/images/random/:count" {
            get { params: RandomImages, result: BreedImages, }
        }
    }
}

#[derive(Debug, Serialize)]
struct RandomImages {
    breed: String,
    count: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let options = ClientOptions::default()
        .with_prefix_url("https://dog.ceo/api")?
        .with_header("Accept", "application/json");
    let client = TypedClient::<DogsApi>::new(options)?;

    // Simple get call with no parameters
    let breeds = client
        .get::<ListAll>(Default::default(), None)
        .json()
        .await?;
    println!("{} breeds", breeds.message.len());

    // Get call with a path parameter
    let hound = Breed {
        breed: "hound".to_string(),
    };
    let images = client.get::<Images>(hound, None).json().await?;
    println!("{} hound images", images.message.len());

    // Several path parameters, and per-call options
    let random = RandomImages {
        breed: "beagle".to_string(),
        count: 3,
    };
    let options = EndpointOptions::new().with_header("x-request-id", "dogs-example");
    let images = client
        .get::<Random>(random, Some(options))
        .json()
        .await?;
    for image in images.message {
        println!("{image}");
    }

    Ok(())
}
