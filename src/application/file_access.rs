//! AuthorizeFileAccess - decides who may retrieve an asset URL.

use std::sync::Arc;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{BeatId, DomainError, ErrorCode, SoundPackId};
use crate::domain::users::User;
use crate::ports::{CatalogStore, SaleStore};

/// Grant returned on successful authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct FileGrant {
    pub file_url: String,
    /// Only for buyers: the contract covering this purchase, when one was
    /// generated. Producers are the grantor, never the grantee.
    pub contract_url: Option<String>,
}

/// Handler for the access control gate.
///
/// Producer-owner access is unconditional; buyer access requires an exact
/// `(item, buyer, file_type)` sale match.
pub struct AuthorizeFileAccess {
    catalog: Arc<dyn CatalogStore>,
    sales: Arc<dyn SaleStore>,
}

impl AuthorizeFileAccess {
    pub fn new(catalog: Arc<dyn CatalogStore>, sales: Arc<dyn SaleStore>) -> Self {
        Self { catalog, sales }
    }

    pub async fn beat_file(
        &self,
        user: &User,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<FileGrant, DomainError> {
        let beat = self
            .catalog
            .find_beat(beat_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::BeatNotFound, "Beat not found"))?;

        let tier = self
            .catalog
            .find_beat_file(beat_id, file_type)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::FileTierUnavailable,
                    format!("No {} file found for this beat", file_type),
                )
            })?;

        if user.is_producer() && user.id == beat.producer_id {
            return Ok(FileGrant {
                file_url: tier.file_url,
                contract_url: None,
            });
        }

        let sale = self
            .sales
            .find_beat_sale(user.id, beat_id, file_type)
            .await?;
        if sale.is_none() {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "You have not purchased this file",
            ));
        }

        let contract = self
            .sales
            .find_contract(user.id, beat_id, file_type)
            .await?;

        Ok(FileGrant {
            file_url: tier.file_url,
            contract_url: contract.and_then(|c| c.contract_url),
        })
    }

    /// Sound pack downloads follow the same rule without a tier dimension.
    pub async fn soundpack_file(
        &self,
        user: &User,
        soundpack_id: SoundPackId,
    ) -> Result<FileGrant, DomainError> {
        let pack = self
            .catalog
            .find_soundpack(soundpack_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::SoundPackNotFound, "Soundpack not found"))?;

        let file_url = pack.file_url.clone().ok_or_else(|| {
            DomainError::new(ErrorCode::FileTierUnavailable, "Soundpack has no file")
        })?;

        if user.is_producer() && user.id == pack.producer_id {
            return Ok(FileGrant {
                file_url,
                contract_url: None,
            });
        }

        let sale = self
            .sales
            .find_soundpack_sale(user.id, soundpack_id)
            .await?;
        if sale.is_none() {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "You have not purchased this soundpack",
            ));
        }

        Ok(FileGrant {
            file_url,
            contract_url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        beat_fixture, pack_fixture, user_fixture, InMemoryCatalog, InMemorySales,
    };
    use crate::domain::foundation::{ContractId, Role, SaleId, UserId};
    use crate::domain::payment::{Contract, Sale};
    use chrono::Utc;

    fn sale(buyer: i64, beat: i64, file_type: FileType) -> Sale {
        Sale {
            id: SaleId::new(1),
            buyer_id: UserId::new(buyer),
            producer_id: Some(UserId::new(1)),
            beat_id: Some(BeatId::new(beat)),
            soundpack_id: None,
            contract_id: None,
            amount: 40.0,
            file_type: Some(file_type),
            created_at: Utc::now(),
        }
    }

    fn contract(buyer: i64, beat: i64, file_type: FileType) -> Contract {
        Contract {
            id: ContractId::new(1),
            buyer_id: UserId::new(buyer),
            beat_id: BeatId::new(beat),
            file_type,
            contract_type: "license".to_string(),
            terms: None,
            price: 40.0,
            status: "active".to_string(),
            contract_url: Some("https://files.example/contracts/c1.md".to_string()),
            contract_template_id: None,
            created_at: Utc::now(),
        }
    }

    fn gate(catalog: InMemoryCatalog, sales: InMemorySales) -> AuthorizeFileAccess {
        AuthorizeFileAccess::new(Arc::new(catalog), Arc::new(sales))
    }

    #[tokio::test]
    async fn producer_owner_gets_file_without_a_sale() {
        let g = gate(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Wav, 80.0)]),
            InMemorySales::new(),
        );

        let grant = g
            .beat_file(&user_fixture(1, Role::Producer), BeatId::new(3), FileType::Wav)
            .await
            .unwrap();

        assert!(grant.file_url.contains("/beats/3/wav"));
        assert!(grant.contract_url.is_none());
    }

    #[tokio::test]
    async fn producer_role_alone_is_not_enough() {
        // A producer who does not own the beat is an ordinary buyer here.
        let g = gate(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Wav, 80.0)]),
            InMemorySales::new(),
        );

        let err = g
            .beat_file(&user_fixture(2, Role::Producer), BeatId::new(3), FileType::Wav)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn buyer_with_matching_sale_gets_file_and_contract() {
        let g = gate(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
            InMemorySales::new()
                .with_sale(sale(5, 3, FileType::Mp3))
                .with_contract(contract(5, 3, FileType::Mp3)),
        );

        let grant = g
            .beat_file(&user_fixture(5, Role::Buyer), BeatId::new(3), FileType::Mp3)
            .await
            .unwrap();

        assert!(grant.file_url.contains("/beats/3/mp3"));
        assert_eq!(
            grant.contract_url.as_deref(),
            Some("https://files.example/contracts/c1.md")
        );
    }

    #[tokio::test]
    async fn buyer_without_contract_gets_file_only() {
        let g = gate(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
            InMemorySales::new().with_sale(sale(5, 3, FileType::Mp3)),
        );

        let grant = g
            .beat_file(&user_fixture(5, Role::Buyer), BeatId::new(3), FileType::Mp3)
            .await
            .unwrap();
        assert!(grant.contract_url.is_none());
    }

    #[tokio::test]
    async fn sale_for_a_different_tier_does_not_grant_access() {
        let g = gate(
            InMemoryCatalog::new().with_beat(
                beat_fixture(3, 1, false),
                vec![(FileType::Mp3, 50.0), (FileType::Wav, 80.0)],
            ),
            InMemorySales::new().with_sale(sale(5, 3, FileType::Mp3)),
        );

        let err = g
            .beat_file(&user_fixture(5, Role::Buyer), BeatId::new(3), FileType::Wav)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn missing_beat_or_tier_is_not_found() {
        let g = gate(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
            InMemorySales::new(),
        );

        let err = g
            .beat_file(&user_fixture(5, Role::Buyer), BeatId::new(99), FileType::Mp3)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BeatNotFound);

        let err = g
            .beat_file(&user_fixture(5, Role::Buyer), BeatId::new(3), FileType::Trackout)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTierUnavailable);
    }

    #[tokio::test]
    async fn soundpack_access_mirrors_the_beat_rule() {
        let g = gate(
            InMemoryCatalog::new().with_pack(pack_fixture(9, 2, 25.0)),
            InMemorySales::new(),
        );

        // Owner passes.
        let grant = g
            .soundpack_file(&user_fixture(2, Role::Producer), SoundPackId::new(9))
            .await
            .unwrap();
        assert!(grant.file_url.ends_with("/packs/9.zip"));

        // Stranger is rejected.
        let err = g
            .soundpack_file(&user_fixture(5, Role::Buyer), SoundPackId::new(9))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
