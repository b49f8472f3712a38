use thiserror::Error;

/// Ошибки сверки и выгрузки остатков
///
/// Ядро синхронизации возвращает только эти ошибки и ничего не сообщает
/// пользователю само: решение «пропустить подключение или остановиться»
/// принимает вызывающий код.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Соединение не установлено, таймаут, обрыв ответа
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Маркетплейс ответил статусом, отличным от 2xx
    #[error("{marketplace} API request failed with status {status}: {body}")]
    Api {
        marketplace: &'static str,
        status: u16,
        body: String,
    },

    /// Ответ не разобран или пагинация не продвигается
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid quantity {raw:?} for code {code}")]
    InvalidQuantity { code: String, raw: String },

    #[error("Invalid price {raw:?} for code {code}")]
    InvalidPrice { code: String, raw: String },

    /// Пакет не принят; предыдущие пакеты уже применены маркетплейсом
    #[error("Batch {chunk} of {total_chunks} was rejected: {source}")]
    BatchSubmit {
        chunk: usize,
        total_chunks: usize,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,
}

impl SyncError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Ошибка сети, а не данных: повторный запуск может пройти успешно
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::BatchSubmit { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
