/// Метаданные UseCase для идентификации в логах
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u502")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "sync_marketplace_stocks")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя (например, "Выгрузка остатков и цен")
    fn display_name() -> &'static str;

    /// Описание UseCase
    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u502_sync_marketplace_stocks"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
