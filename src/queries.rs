// Static GraphQL documents sent to the labeling API.
//
// The documents are fixed request templates; callers supply the
// `variables` mapping that matches each document's input type.

// =============================================================================
// Food queries
// =============================================================================

pub const FOOD_SEARCH: &str = r#"
query ($input: FoodSearchInput!) {
    foods {
        search(input: $input) {
            foodSearchResults {
                id
                name
                modified
                created
                versionName
                eshaCode
                foodType
                product
                supplier
                versionHistoryId
            }
            totalCount
            pageInfo {
                cursor
                hasNextPage
                startCursor
                endCursor
            }
        }
    }
}
"#;

pub const GET_ANALYSIS: &str = r#"
query ($input: GetAnalysisInput!) {
    analysis {
        getAnalysis(input: $input) {
            analysis {
                analysisType
                nutrientInfos {
                    nutrient {
                        id
                        name
                    }
                    value
                }
                amountAnalyzed {
                    quantity { value }
                    unit { name }
                }
                weight {
                    quantity { value }
                    unit { name }
                }
            }
        }
    }
}
"#;

pub const GET_FOOD_DETAILS: &str = r#"
query ($input: GetFoodInput!) {
    foods {
        get(input: $input) {
            food {
                id
                name
                costPerAmount {
                    cost
                    amount {
                        quantity { value }
                        unit { name }
                    }
                }
                customFields {
                    customField { name }
                    value
                }
                notes {
                    text
                }
                items {
                    id
                    food { id name }
                    amount {
                        quantity { value }
                        unit { name }
                    }
                }
                tags {
                    name
                }
            }
        }
    }
}
"#;

pub const GET_STATEMENTS: &str = r#"
query ($input: GetFoodInput!) {
    foods {
        getStatements(input: $input) {
            ingredientStatement {
                statement
            }
            allergenStatement {
                statement
            }
        }
    }
}
"#;

// =============================================================================
// Label mutations
// =============================================================================

pub const CREATE_US2016_LABEL: &str = r#"
mutation ($input: CreateUnitedStates2016LabelInput!) {
    label {
        unitedStates2016 {
            create(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const CREATE_CA2016_LABEL: &str = r#"
mutation ($input: CreateCanada2016LabelInput!) {
    label {
        canada2016 {
            create(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const CREATE_EU2011_LABEL: &str = r#"
mutation ($input: CreateEuropeanUnion2011LabelInput!) {
    label {
        europeanUnion2011 {
            create(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const CREATE_MX2020_LABEL: &str = r#"
mutation ($input: CreateMexico2020LabelInput!) {
    label {
        mexico2020 {
            create(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const SET_US2016_LABEL_ITEMS: &str = r#"
mutation ($input: SetUnitedStates2016LabelItemsInput!) {
    label {
        unitedStates2016 {
            setLabelItems(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const SET_CA2016_LABEL_ITEMS: &str = r#"
mutation ($input: SetCanada2016LabelItemsInput!) {
    label {
        canada2016 {
            setLabelItems(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const SET_EU2011_LABEL_ITEM: &str = r#"
mutation ($input: SetEuropeanUnion2011LabelItemInput!) {
    label {
        europeanUnion2011 {
            setLabelItem(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

pub const SET_MX2020_LABEL_ITEM: &str = r#"
mutation ($input: SetMexico2020LabelItemInput!) {
    label {
        mexico2020 {
            setLabelItem(input: $input) {
                label { id name }
            }
        }
    }
}
"#;

// =============================================================================
// Import mutations
// =============================================================================

pub const GET_USER_SUPPLIERS: &str = r#"
query ($input: GetUserAddedSuppliersInput!) {
    suppliers {
        getUserAdded(input: $input) {
            suppliers { id name }
        }
    }
}
"#;

pub const CREATE_SUPPLIER: &str = r#"
mutation ($input: CreateSupplierInput!) {
    suppliers {
        create(input: $input) {
            supplier { id name }
        }
    }
}
"#;

pub const CREATE_FOOD: &str = r#"
mutation ($input: CreateFoodInput!) {
    foods {
        create(input: $input) {
            food { id name }
        }
    }
}
"#;

/// Sets nutrient values and the food's reference amount in one request.
pub const SET_NUTRIENTS_AND_AMOUNT: &str = r#"
mutation ($input: SetNutrientValuesInput!, $amountInput: SetFoodAmountInput!) {
    foods {
        setNutrientValues(input: $input) {
            food { id name }
        },
        setAmount(input: $amountInput) {
            food { id }
        }
    }
}
"#;

pub const SET_SUPPLIER: &str = r#"
mutation ($input: SetSupplierInput!) {
    foods {
        setSupplier(input: $input) {
            food {
                supplier { id name }
            }
        }
    }
}
"#;

pub const SET_ALIASES: &str = r#"
mutation ($input: SetAliasesInput!) {
    foods {
        setAliases(input: $input) {
            food {
                aliases { id name }
            }
        }
    }
}
"#;

pub const SET_ALLERGENS: &str = r#"
mutation ($input: SetAllergensInput!) {
    foods {
        setAllergens(input: $input) {
            food { id }
        }
    }
}
"#;

pub const VERIFY_ALLERGENS: &str = r#"
mutation ($input: VerifyAllergensInput!) {
    foods {
        verifyAllergens(input: $input) {
            food { id }
        }
    }
}
"#;

pub const APPROVE_FOOD: &str = r#"
mutation ($input: ApproveFoodInput!) {
    foods {
        approve(input: $input) {
            food { id }
        }
    }
}
"#;
