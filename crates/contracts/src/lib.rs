//! Общие типы между CLI синхронизации и маркетплейс-клиентами

pub mod domain;
pub mod enums;
pub mod usecases;
