use std::{collections::HashMap, future::Future, hash::Hash};

use futures::future::try_join_all;

/// Runs every named producer concurrently on the current task and collects
/// the results by name.
///
/// Resolves only when all producers succeed. The first failure is returned
/// right away; producers still pending are dropped and results that already
/// arrived are discarded. For a fixed set of differently typed producers use
/// `futures::try_join!` instead.
///
/// If a name appears twice, the later producer's result is kept.
pub async fn join_parallel<K, T, Err, I, F>(producers: I) -> Result<HashMap<K, T>, Err>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, F)>,
    F: Future<Output = Result<T, Err>>,
{
    let (names, pending): (Vec<K>, Vec<F>) = producers.into_iter().unzip();
    let values = try_join_all(pending).await?;
    Ok(names.into_iter().zip(values).collect())
}

#[cfg(test)]
#[path = "tests/join_tests.rs"]
mod tests;
