//! BoostingConfig → xgboost booster parameters.

use crate::{config::BoostingConfig, error::{PricingError, PricingResult}};
use xgboost::parameters::{
    learning::{LearningTaskParametersBuilder, Objective},
    tree::{GrowPolicy, TreeBoosterParametersBuilder, TreeMethod},
    BoosterParameters, BoosterParametersBuilder, BoosterType,
};

fn setup_error(what: &str, e: String) -> PricingError {
    PricingError::Other(anyhow::anyhow!("booster {what} parameters: {e}"))
}

/// Leaf-wise histogram trees on squared error, starting from
/// `base_score`. `max_depth` 0 leaves depth unbounded so `num_leaves`
/// is the only size limit. With unit hessians `min_child_weight` is a
/// row count.
pub fn booster_parameters(config: &BoostingConfig, base_score: f64) -> PricingResult<BoosterParameters> {
    let tree = TreeBoosterParametersBuilder::default()
        .eta(config.learning_rate as f32)
        .max_depth(0)
        .grow_policy(GrowPolicy::LossGuide)
        .max_leaves(config.num_leaves as u32)
        .tree_method(TreeMethod::Hist)
        .max_bin(config.max_bin as u32)
        .min_child_weight(config.min_data_in_leaf as f32)
        .lambda(config.lambda_l2 as f32)
        .build()
        .map_err(|e| setup_error("tree", e))?;

    let learning = LearningTaskParametersBuilder::default()
        .objective(Objective::RegLinear)
        .base_score(base_score as f32)
        .build()
        .map_err(|e| setup_error("learning", e))?;

    BoosterParametersBuilder::default()
        .booster_type(BoosterType::Tree(tree))
        .learning_params(learning)
        .verbose(false)
        .build()
        .map_err(|e| setup_error("booster", e))
}
