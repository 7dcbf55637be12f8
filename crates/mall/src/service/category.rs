use crate::{
    abstract_trait::category::{CategoryServiceTrait, DynCategoryRepository},
    domain::response::category::CategoryResponse,
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use tracing::{error, info};

#[derive(Clone)]
pub struct CategoryService {
    repo: DynCategoryRepository,
}

impl CategoryService {
    pub fn new(repo: DynCategoryRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn first_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = self.repo.find_first_level().await.map_err(|e| {
            error!("❌ Failed to load first-level categories: {e:?}");
            ServiceError::Repo(e)
        })?;

        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn second_categories(
        &self,
        cate_prtcode: i32,
    ) -> Result<Vec<CategoryResponse>, ServiceError> {
        info!("📂 Loading categories under {cate_prtcode}");

        let categories = self.repo.find_children(cate_prtcode).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn parent_of(&self, cate_code: i32) -> Result<Option<CategoryResponse>, ServiceError> {
        let category = self
            .repo
            .find_by_code(cate_code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {cate_code} not found")))?;

        match category.cate_prtcode {
            Some(parent) => Ok(self
                .repo
                .find_by_code(parent)
                .await?
                .map(CategoryResponse::from)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abstract_trait::category::CategoryRepositoryTrait, model::category::Category};
    use shared::errors::RepositoryError;
    use std::sync::Arc;

    struct Tree(Vec<Category>);

    #[async_trait]
    impl CategoryRepositoryTrait for Tree {
        async fn find_first_level(&self) -> Result<Vec<Category>, RepositoryError> {
            Ok(self.0.iter().filter(|c| c.cate_prtcode.is_none()).cloned().collect())
        }

        async fn find_children(&self, cate_prtcode: i32) -> Result<Vec<Category>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|c| c.cate_prtcode == Some(cate_prtcode))
                .cloned()
                .collect())
        }

        async fn find_by_code(&self, cate_code: i32) -> Result<Option<Category>, RepositoryError> {
            Ok(self.0.iter().find(|c| c.cate_code == cate_code).cloned())
        }
    }

    fn service() -> CategoryService {
        let node = |code, parent, name: &str| Category {
            cate_code: code,
            cate_prtcode: parent,
            cate_name: name.to_string(),
        };
        CategoryService::new(Arc::new(Tree(vec![
            node(1, None, "Books"),
            node(11, Some(1), "Fiction"),
            node(12, Some(1), "Computing"),
        ])))
    }

    #[tokio::test]
    async fn parent_of_second_level_is_its_first_level() {
        let parent = service().parent_of(12).await.unwrap().unwrap();
        assert_eq!(parent.cate_code, 1);
        assert_eq!(parent.cate_name, "Books");
    }

    #[tokio::test]
    async fn first_level_has_no_parent() {
        assert!(service().parent_of(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let err = service().parent_of(77).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn children_are_listed_by_parent() {
        let children = service().second_categories(1).await.unwrap();
        let codes: Vec<i32> = children.iter().map(|c| c.cate_code).collect();
        assert_eq!(codes, vec![11, 12]);
    }
}
