use renderlab_http::{FetchClient, FetchOptions, PlaceholderApi, User};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = PlaceholderApi::new();
    let posts = api.posts(3).await?;
    for post in &posts {
        println!("#{} {}", post.id, post.title);
    }

    let client = FetchClient::new().with_options(FetchOptions {
        timeout_ms: 5_000,
        max_retries: 2,
        retry_base_ms: 300,
    });
    let users: Vec<User> = client
        .fetch_json("https://jsonplaceholder.typicode.com/users")
        .await?;
    println!("{} users", users.len());

    Ok(())
}
