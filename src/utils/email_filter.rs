use anyhow::{anyhow, Result};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcounts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> = Lazy::new(|| {
    RwLock::new(CuckooFilter::new(
        FILTER_CAPACITY,
        FALSE_POSITIVE_RATE,
    ))
});

/// Email uniqueness is per collection (an admin and an employee may share an
/// address), so filter keys carry the collection scope.
#[inline]
fn normalize(scope: &str, email: &str) -> String {
    format!("{}:{}", scope, email.to_lowercase())
}

/// Check if an email might exist in a collection (false positives possible)
pub fn might_exist(scope: &str, email: &str) -> bool {
    let key = normalize(scope, email);
    EMAIL_FILTER
        .read()
        .expect("email filter poisoned")
        .contains(&key)
}

/// Insert a single email into the filter
pub fn insert(scope: &str, email: &str) {
    let key = normalize(scope, email);
    EMAIL_FILTER
        .write()
        .expect("email filter poisoned")
        .add(&key);
}

/// Remove an email from the filter
pub fn remove(scope: &str, email: &str) {
    let key = normalize(scope, email);
    EMAIL_FILTER
        .write()
        .expect("email filter poisoned")
        .remove(&key);
}

/// Warm up the email filter from both identity tables using streaming + batching
pub async fn warmup_email_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut total = 0usize;

    for (scope, sql) in [
        ("admin", "SELECT email FROM admins"),
        ("employee", "SELECT email FROM employees"),
    ] {
        let mut stream = sqlx::query_as::<_, (String,)>(sql).fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);

        while let Some(row) = stream.next().await {
            let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

            batch.push(normalize(scope, &email));
            total += 1;

            if batch.len() == batch_size {
                insert_batch(&batch);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            insert_batch(&batch);
        }
    }

    log::info!("Email filter warmup complete: {} identities", total);
    Ok(())
}

/// Insert a batch of normalized keys
fn insert_batch(keys: &[String]) {
    let mut filter = EMAIL_FILTER.write().expect("email filter poisoned");

    for key in keys {
        filter.add(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_do_not_collide() {
        insert("admin", "Shared@Company.com");

        assert!(might_exist("admin", "shared@company.com"));
        assert!(!might_exist("employee", "shared@company.com"));

        remove("admin", "shared@company.com");
    }
}
