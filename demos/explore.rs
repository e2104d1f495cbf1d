//! Browse an ontology repository API from the command line
//!
//! ```text
//! LDCLIENT_CONFIG=client.yaml cargo run --example explore -- BRO
//! ```

use ldclient::models::Ontology;
use ldclient::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::var("LDCLIENT_CONFIG") {
        Ok(path) => ClientConfig::from_yaml_file(&path)?,
        Err(_) => ClientConfig::new("https://data.bioontology.org")
            .with_apikey(std::env::var("LDCLIENT_APIKEY").unwrap_or_default()),
    };
    let acronym = std::env::args().nth(1).unwrap_or_else(|| "BRO".to_string());

    let client = Client::builder()
        .with_config(config)
        .with_reqwest()
        .with_default_models()
        .build()?;

    let ontologies = Ontology::collection(&client)
        .find_by_method("find_by_acronym", vec![acronym.as_str().into()], Params::new())
        .await?;

    for resource in ontologies {
        let ontology = match resource.downcast::<Ontology>() {
            Ok(ontology) => ontology,
            Err(generic) => {
                tracing::warn!(id = ?generic.id(), "not an ontology");
                continue;
            }
        };

        println!("{} ({})", ontology["name"].as_str().unwrap_or("?"), ontology.id().unwrap_or("-"));

        let explorer = ontology.explore(&client);
        for name in explorer.link_names() {
            println!("  link: {} -> {:?}", name, explorer.media_type_of(name));
        }

        if let Some(resolved) = explorer.get("latest_submission").await? {
            for submission in resolved.into_vec() {
                println!(
                    "  latest submission: {} [{}]",
                    submission.id().unwrap_or("-"),
                    submission.kind().unwrap_or("generic")
                );
            }
        }
    }

    Ok(())
}
