//! Conversion logic between DTOs and domain entities.

use crate::domain::{entity, value_object::FileId};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::Participant> for dto::ParticipantInfo {
    fn from(model: entity::Participant) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            display_name: model.display_name,
            connection_id: model.connection_id.into_string(),
            joined_at: model.joined_at.value(),
        }
    }
}

impl From<entity::RoomFile> for dto::FileDto {
    fn from(model: entity::RoomFile) -> Self {
        Self {
            id: model.id.value(),
            name: model.name,
            language: model.language,
            content: model.content,
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::FileDto> for entity::RoomFile {
    fn from(dto: dto::FileDto) -> Self {
        Self {
            id: FileId::new(dto.id),
            name: dto.name,
            language: dto.language,
            content: dto.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Timestamp, UserId};

    #[test]
    fn test_domain_participant_to_dto() {
        // テスト項目: ドメインエンティティの Participant が DTO に変換される
        // given (前提条件):
        let participant = entity::Participant::new(
            UserId::new("alice".to_string()).unwrap(),
            "Alice".to_string(),
            ConnectionId::new("conn-1".to_string()).unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        let dto: dto::ParticipantInfo = participant.into();

        // then (期待する結果):
        assert_eq!(dto.user_id, "alice");
        assert_eq!(dto.display_name, "Alice");
        assert_eq!(dto.connection_id, "conn-1");
        assert_eq!(dto.joined_at, 2000);
    }

    #[test]
    fn test_domain_file_to_dto() {
        // テスト項目: ドメインエンティティの RoomFile が DTO に変換される
        // given (前提条件):
        let file = entity::RoomFile::new(
            FileId::new(1),
            "Solution.py".to_string(),
            "python".to_string(),
            "print(1)".to_string(),
        );

        // when (操作):
        let dto: dto::FileDto = file.into();

        // then (期待する結果):
        assert_eq!(dto.id, 1);
        assert_eq!(dto.name, "Solution.py");
        assert_eq!(dto.language, "python");
        assert_eq!(dto.content, "print(1)");
    }

    #[test]
    fn test_dto_file_to_domain() {
        // テスト項目: DTO の FileDto がドメインエンティティに変換される
        // given (前提条件):
        let dto = dto::FileDto {
            id: 2,
            name: "util.js".to_string(),
            language: "javascript".to_string(),
            content: String::new(),
        };

        // when (操作):
        let file: entity::RoomFile = dto.into();

        // then (期待する結果):
        assert_eq!(file.id, FileId::new(2));
        assert_eq!(file.name, "util.js");
        assert_eq!(file.language, "javascript");
        assert_eq!(file.content, "");
    }
}
