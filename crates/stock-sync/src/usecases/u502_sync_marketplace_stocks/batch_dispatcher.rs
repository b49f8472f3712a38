use std::future::Future;

use crate::shared::error::SyncError;

/// Отправить обновления пакетами не больше `chunk_size`, строго по очереди
///
/// Возвращает число отправленных пакетов. Ошибка пакета останавливает
/// отправку оставшихся; уже принятые пакеты не откатываются.
pub async fn dispatch<T, F, Fut>(
    updates: &[T],
    chunk_size: usize,
    mut submit: F,
) -> Result<usize, SyncError>
where
    T: Clone,
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    if chunk_size == 0 {
        return Err(SyncError::InvalidChunkSize);
    }

    let total_chunks = updates.len().div_ceil(chunk_size);
    for (index, chunk) in updates.chunks(chunk_size).enumerate() {
        tracing::debug!(
            "Submitting chunk {}/{} ({} items)",
            index + 1,
            total_chunks,
            chunk.len()
        );
        submit(chunk.to_vec())
            .await
            .map_err(|e| SyncError::BatchSubmit {
                chunk: index + 1,
                total_chunks,
                source: Box::new(e),
            })?;
    }

    Ok(total_chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chunks_cover_input_in_order() {
        let updates: Vec<u32> = (0..23).collect();
        let mut calls: Vec<Vec<u32>> = Vec::new();

        let sent = dispatch(&updates, 5, |chunk| {
            calls.push(chunk);
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(sent, 5);
        assert_eq!(calls.len(), 5);
        assert!(calls.iter().all(|c| c.len() <= 5));
        assert_eq!(calls[4], vec![20, 21, 22]);
        assert_eq!(calls.concat(), updates);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_chunk() {
        let updates = vec!["a"; 200];
        let mut sizes = Vec::new();

        let sent = dispatch(&updates, 100, |chunk| {
            sizes.push(chunk.len());
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(sent, 2);
        assert_eq!(sizes, vec![100, 100]);
    }

    #[tokio::test]
    async fn test_empty_input_submits_nothing() {
        let mut calls = 0;
        let sent = dispatch(&Vec::<u8>::new(), 10, |_| {
            calls += 1;
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(sent, 0);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_failed_chunk_stops_remaining() {
        let updates: Vec<u32> = (0..10).collect();
        let mut attempted = 0;

        let err = dispatch(&updates, 3, |_| {
            attempted += 1;
            let fail = attempted == 2;
            async move {
                if fail {
                    Err(SyncError::protocol("rejected"))
                } else {
                    Ok(())
                }
            }
        })
        .await
        .unwrap_err();

        assert_eq!(attempted, 2);
        match err {
            SyncError::BatchSubmit {
                chunk,
                total_chunks,
                ..
            } => {
                assert_eq!(chunk, 2);
                assert_eq!(total_chunks, 4);
            }
            other => panic!("expected BatchSubmit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_chunk_size_rejected() {
        let mut calls = 0;
        let result = dispatch(&[1, 2, 3], 0, |_| {
            calls += 1;
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(SyncError::InvalidChunkSize)));
        assert_eq!(calls, 0);
    }
}
