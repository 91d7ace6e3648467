use std::marker::PhantomData;

use sea_orm::Set;
use serde_json::Value;

use crate::db::dao::{DaoBase, DaoContext, DaoLayerError, EntityDao, ModelOf, RecordEntity};
use crate::db::entities::{company_info, cta_section, hero_section};
use crate::error::AppError;
use crate::services::crud_service::{active_from_object, apply_patch};
use crate::validation::{EntitySchema, FieldKind, FieldRule, ValidationMode};

/// A table expected to hold exactly one live row.
pub trait SingletonRecord: RecordEntity {
    const LABEL: &'static str;

    fn schema() -> &'static EntitySchema;

    /// Row inserted the first time the section is read.
    fn default_record() -> Self::ActiveModel;
}

/// Get-or-create, replace and one-shot create for a singleton table.
pub struct SectionService<E> {
    dao: EntityDao<E>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SectionService<E> {
    fn clone(&self) -> Self {
        Self {
            dao: self.dao.clone(),
            _entity: PhantomData,
        }
    }
}

pub type HeroSectionService = SectionService<hero_section::Entity>;
pub type CtaSectionService = SectionService<cta_section::Entity>;
pub type CompanyInfoService = SectionService<company_info::Entity>;

impl<E: SingletonRecord> SectionService<E> {
    pub fn new(daos: &DaoContext) -> Self {
        Self {
            dao: daos.entity::<E>(),
            _entity: PhantomData,
        }
    }

    /// The live row, without creating one.
    pub async fn current(&self) -> Result<Option<ModelOf<E>>, AppError> {
        self.dao
            .find_one(|select| select)
            .await
            .map_err(|err| storage_error::<E>(err))
    }

    /// Two concurrent first reads can each insert a default row.
    pub async fn get_or_create(&self) -> Result<ModelOf<E>, AppError> {
        if let Some(existing) = self.current().await? {
            return Ok(existing);
        }
        tracing::info!(section = E::LABEL, "creating default section");
        self.dao
            .create(E::default_record())
            .await
            .map_err(|err| storage_error::<E>(err))
    }

    pub async fn replace(&self, payload: Value) -> Result<ModelOf<E>, AppError> {
        let object = E::schema().validate(payload, ValidationMode::Update)?;
        if object.is_empty() {
            return Err(AppError::bad_request("payload has no fields to update"));
        }
        let existing = self
            .current()
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} not found", E::LABEL)))?;

        let patch = active_from_object::<E>(object)?;
        let id = id_of::<E>(&existing)?;
        self.dao
            .update(id, move |active| apply_patch::<E>(active, patch))
            .await
            .map_err(|err| match err {
                DaoLayerError::NotFound { .. } => {
                    AppError::not_found(format!("{} not found", E::LABEL))
                }
                other => storage_error::<E>(other),
            })
    }

    pub async fn create(&self, payload: Value) -> Result<ModelOf<E>, AppError> {
        if self.current().await?.is_some() {
            return Err(AppError::conflict(format!("{} already exists", E::LABEL)));
        }
        let object = E::schema().validate(payload, ValidationMode::Create)?;
        let active = active_from_object::<E>(object)?;
        self.dao
            .create(active)
            .await
            .map_err(|err| storage_error::<E>(err))
    }
}

fn storage_error<E: SingletonRecord>(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Db(db_err) => AppError::internal_with_source(
            format!("{} lookup failed. Please check the logs for more details", E::LABEL),
            db_err,
        ),
        other => other.into(),
    }
}

fn id_of<E: SingletonRecord>(model: &ModelOf<E>) -> Result<uuid::Uuid, AppError> {
    use sea_orm::{Iterable, ModelTrait, PrimaryKeyToColumn};

    let column = E::PrimaryKey::iter()
        .next()
        .map(|pk| pk.into_column())
        .ok_or_else(|| AppError::internal(format!("{} has no primary key", E::LABEL)))?;
    match model.get(column) {
        sea_orm::Value::Uuid(Some(id)) => Ok(id),
        _ => Err(AppError::internal(format!("{} id is not a uuid", E::LABEL))),
    }
}

const TITLE: FieldKind = FieldKind::Text { max: 200 };
const BODY: FieldKind = FieldKind::Text { max: 2_000 };
const BUTTON: FieldKind = FieldKind::Text { max: 60 };
const URL: FieldKind = FieldKind::Text { max: 500 };

static HERO_SCHEMA: EntitySchema = EntitySchema {
    entity: "hero_section",
    fields: &[
        FieldRule::required("title_en", TITLE),
        FieldRule::required("title_ar", TITLE),
        FieldRule::required("subtitle_en", BODY),
        FieldRule::required("subtitle_ar", BODY),
        FieldRule::required("cta_label_en", BUTTON),
        FieldRule::required("cta_label_ar", BUTTON),
        FieldRule::required("cta_url", URL),
        FieldRule::required("background_image_url", URL),
    ],
};

impl SingletonRecord for hero_section::Entity {
    const LABEL: &'static str = "Hero section";

    fn schema() -> &'static EntitySchema {
        &HERO_SCHEMA
    }

    fn default_record() -> hero_section::ActiveModel {
        hero_section::ActiveModel {
            title_en: Set("Kitchens crafted for a lifetime".to_string()),
            title_ar: Set("مطابخ مصممة لتدوم مدى الحياة".to_string()),
            subtitle_en: Set("Bespoke luxury kitchens, designed and installed by our studio.".to_string()),
            subtitle_ar: Set("مطابخ فاخرة حسب الطلب، من التصميم حتى التركيب.".to_string()),
            cta_label_en: Set("Book a consultation".to_string()),
            cta_label_ar: Set("احجز استشارة".to_string()),
            cta_url: Set("#contact".to_string()),
            background_image_url: Set("/static/images/hero.jpg".to_string()),
            ..Default::default()
        }
    }
}

static CTA_SCHEMA: EntitySchema = EntitySchema {
    entity: "cta_section",
    fields: &[
        FieldRule::required("title_en", TITLE),
        FieldRule::required("title_ar", TITLE),
        FieldRule::required("body_en", BODY),
        FieldRule::required("body_ar", BODY),
        FieldRule::required("button_label_en", BUTTON),
        FieldRule::required("button_label_ar", BUTTON),
        FieldRule::required("button_url", URL),
    ],
};

impl SingletonRecord for cta_section::Entity {
    const LABEL: &'static str = "CTA section";

    fn schema() -> &'static EntitySchema {
        &CTA_SCHEMA
    }

    fn default_record() -> cta_section::ActiveModel {
        cta_section::ActiveModel {
            title_en: Set("Ready to plan your kitchen?".to_string()),
            title_ar: Set("هل أنت مستعد لتخطيط مطبخك؟".to_string()),
            body_en: Set("Visit our showroom or send us your floor plan.".to_string()),
            body_ar: Set("زر صالة العرض أو أرسل لنا مخطط المساحة.".to_string()),
            button_label_en: Set("Contact us".to_string()),
            button_label_ar: Set("تواصل معنا".to_string()),
            button_url: Set("#contact".to_string()),
            ..Default::default()
        }
    }
}

static COMPANY_SCHEMA: EntitySchema = EntitySchema {
    entity: "company_info",
    fields: &[
        FieldRule::required("name_en", TITLE),
        FieldRule::required("name_ar", TITLE),
        FieldRule::required("about_en", FieldKind::Text { max: 10_000 }),
        FieldRule::required("about_ar", FieldKind::Text { max: 10_000 }),
        FieldRule::required("address_en", TITLE),
        FieldRule::required("address_ar", TITLE),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::required("phone", FieldKind::Text { max: 40 }),
        FieldRule::required("founded_year", FieldKind::Int { min: 1800, max: 2100 }),
    ],
};

impl SingletonRecord for company_info::Entity {
    const LABEL: &'static str = "Company info";

    fn schema() -> &'static EntitySchema {
        &COMPANY_SCHEMA
    }

    fn default_record() -> company_info::ActiveModel {
        company_info::ActiveModel {
            name_en: Set("Kitchen Studio".to_string()),
            name_ar: Set("استوديو المطابخ".to_string()),
            about_en: Set("We design and build luxury kitchens.".to_string()),
            about_ar: Set("نصمم وننفذ المطابخ الفاخرة.".to_string()),
            address_en: Set("Showroom address".to_string()),
            address_ar: Set("عنوان صالة العرض".to_string()),
            email: Set("info@example.com".to_string()),
            phone: Set(String::new()),
            founded_year: Set(2010),
            ..Default::default()
        }
    }
}
