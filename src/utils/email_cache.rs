use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// true  => email is TAKEN in that collection
/// false => email is AVAILABLE (usually we store only taken)
pub static EMAIL_CACHE: Lazy<Cache<String, bool>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

#[inline]
fn key(scope: &str, email: &str) -> String {
    format!("{}:{}", scope, email.to_lowercase())
}

/// Mark a single email as taken
pub async fn mark_taken(scope: &str, email: &str) {
    EMAIL_CACHE.insert(key(scope, email), true).await;
}

/// Check if an email is taken
pub async fn is_taken(scope: &str, email: &str) -> bool {
    EMAIL_CACHE.get(&key(scope, email)).await.unwrap_or(false)
}

/// Forget an email, e.g. after the owning record is deleted or re-keyed
pub async fn mark_free(scope: &str, email: &str) {
    EMAIL_CACHE.invalidate(&key(scope, email)).await;
}

/// Batch mark emails as taken
async fn batch_mark(scope: &str, emails: &[String]) {
    let futures: Vec<_> = emails
        .iter()
        .map(|e| EMAIL_CACHE.insert(key(scope, e), true))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load admins and RECENTLY created employees into the in-memory cache (batched)
pub async fn warmup_email_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut total_count = 0usize;

    let sources: [(&str, &str, Option<u32>); 2] = [
        ("admin", "SELECT email FROM admins", None),
        (
            "employee",
            r#"
            SELECT email
            FROM employees
            WHERE created_at >= NOW() - INTERVAL ? DAY
            ORDER BY created_at DESC
            "#,
            Some(days),
        ),
    ];

    for (scope, sql, bind_days) in sources {
        let mut query = sqlx::query_as::<_, (String,)>(sql);
        if let Some(days) = bind_days {
            query = query.bind(days);
        }
        let mut stream = query.fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);

        while let Some(row) = stream.next().await {
            let (email,) = row?;
            batch.push(email);
            total_count += 1;

            if batch.len() >= batch_size {
                batch_mark(scope, &batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            batch_mark(scope, &batch).await;
        }
    }

    log::info!(
        "Email cache warmup complete: {} identities (employees from last {} days)",
        total_count,
        days
    );

    Ok(())
}
